/// Copies `src` into `dst`, keeping `dst`'s allocation whenever it is
/// already at least `src.len()` bytes long.
///
/// When `dst` is longer, the bytes after `src.len()` are zeroed so that no
/// stale payload from the previous value stays reachable. Returns `true`
/// when the existing buffer was reused.
pub(crate) fn copy_reusing(dst: &mut Vec<u8>, src: &[u8]) -> bool {
    if !dst.is_empty() && dst.len() >= src.len() {
        let (head, tail) = dst.split_at_mut(src.len());
        head.copy_from_slice(src);
        tail.fill(0);
        true
    } else {
        dst.clear();
        dst.extend_from_slice(src);
        false
    }
}
