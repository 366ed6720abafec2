// Shared ANSI/VT100 control sequences used across the UI.

/// Reset terminal styling to defaults.
pub const STYLE_RESET: &str = crate::csi!("0m");
/// Bold text.
pub const STYLE_BOLD: &str = crate::csi!("1m");
/// Faint text; unavailable rows and muted cells.
pub const STYLE_DIM: &str = crate::csi!("2m");
/// Italic text.
pub const STYLE_ITALIC: &str = crate::csi!("3m");
/// Underline; preferred days of a service order.
pub const STYLE_UNDERLINE: &str = crate::csi!("4m");
/// Light gray foreground.
pub const FG_LIGHT_GRAY: &str = crate::csi!("37m");
pub const FG_RED: &str = crate::csi!("31m");
pub const FG_GREEN: &str = crate::csi!("32m");
pub const FG_YELLOW: &str = crate::csi!("33m");
pub const FG_CYAN: &str = crate::csi!("36m");

/// Wraps `s` in `style` and a reset.
pub fn styled(style: &str, s: impl AsRef<str>) -> String {
    format!("{style}{}{STYLE_RESET}", s.as_ref())
}
