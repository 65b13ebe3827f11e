//! Stack safety for the recursive parser and evaluator.
//!
//! Deeply nested source or deep (but bounded) Lox recursion would otherwise
//! exhaust the native stack long before the interpreter's own call-depth limit
//! fires.  Recursive entry points wrap themselves in [`ensure_sufficient_stack`].
//! Dropping a tree is recursion too but cannot be wrapped; the parser's
//! nesting limit keeps that depth bounded.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
