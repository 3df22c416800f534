pub(crate) fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Printable run length starting at `ofs`.
pub(crate) fn printable_run(buf: &[u8], ofs: usize) -> usize {
    buf[ofs..]
        .iter()
        .take_while(|b| is_printable(**b))
        .count()
}
