//! Centralized interpreter limits.
//!
//! All magic numbers that bound recursion are collected here for easy
//! tuning. The evaluator is recursive over both AST depth and call depth,
//! so both are guarded and raise `StackOverflow` well before the native
//! stack is exhausted.

/// Maximum function call nesting depth.
pub const MAX_CALL_DEPTH: usize = 200;

/// Maximum evaluator recursion depth over AST nodes. Each level costs one
/// native stack frame, so this stays comfortably inside a default 8 MiB
/// thread stack even in debug builds.
pub const MAX_EVAL_DEPTH: usize = 4_000;

/// Maximum depth for `__index` / `__newindex` / `__call` metamethod chains.
/// Prevents infinite loops in metamethod resolution.
pub const MAX_TAG_LOOP: usize = 2_000;
