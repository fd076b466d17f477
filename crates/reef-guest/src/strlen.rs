/// Count the bytes before the first zero byte of `buf`.
///
/// An absent buffer has length 0. The scan is bounded by the slice, so a
/// buffer without a terminator reports its full length instead of reading
/// past its end.
pub fn strlen(buf: Option<&[u8]>) -> usize {
    match buf {
        Some(bytes) => bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len()),
        None => 0,
    }
}
