/// Opens every control sequence; `WidthUtil` skips from here to the final letter.
pub const ESC_BYTE: u8 = 0x1B;

/// `csi!("31m")` expands to the literal `"\x1B[31m"`, usable in consts.
#[macro_export]
macro_rules! csi {
    ($suffix:literal) => {
        concat!("\x1B[", $suffix)
    };
}
