use crate::core::context::{Notice, NoticeLevel};
use crate::ui::ansi::{
    FG_CYAN, FG_GREEN, FG_LIGHT_GRAY, FG_RED, STYLE_BOLD, STYLE_ITALIC, STYLE_RESET, styled,
};
use crate::ui::width_util::WidthUtil;
use std::io::{self, Write};

const INNER_WIDTH: usize = 50;

/// Screen-level helpers: the centered banner and the notice strip.
#[derive(Debug, Default, Clone)]
pub struct UiChrome {
    util: WidthUtil,
}

impl UiChrome {
    pub fn new() -> Self {
        Self {
            util: WidthUtil::default(),
        }
    }

    pub fn render_banner<W: Write + ?Sized>(&self, subtitle: &str, out: &mut W) -> io::Result<()> {
        let version = env!("CARGO_PKG_VERSION");
        let title = format!(
            "{STYLE_BOLD}C R E W B O A R D{STYLE_RESET} {FG_LIGHT_GRAY}(v{version}){STYLE_RESET}"
        );
        let subtitle = format!("{STYLE_ITALIC}{subtitle}{STYLE_RESET}");
        let pad = " ".repeat(self.util.center_pad(INNER_WIDTH + 2));
        writeln!(out, "{pad}╭{}╮", "─".repeat(INNER_WIDTH))?;
        writeln!(out, "{pad}│{}│", self.center_in_box(&title, INNER_WIDTH))?;
        writeln!(out, "{pad}│{}│", self.center_in_box(&subtitle, INNER_WIDTH))?;
        writeln!(out, "{pad}╰{}╯", "─".repeat(INNER_WIDTH))
    }

    pub fn format_notice(&self, notice: &Notice) -> String {
        let (style, tag) = match notice.level {
            NoticeLevel::Success => (FG_GREEN, "OK"),
            NoticeLevel::Info => (FG_CYAN, "INFO"),
            NoticeLevel::Error => (FG_RED, "ERROR"),
        };
        format!("{} {}", styled(style, format!("[{tag}]")), notice.message)
    }

    pub fn render_notices<W: Write + ?Sized>(
        &self,
        notices: &[Notice],
        out: &mut W,
    ) -> io::Result<()> {
        for notice in notices {
            writeln!(out, "{}", self.format_notice(notice))?;
        }
        Ok(())
    }

    fn center_in_box(&self, content: &str, width: usize) -> String {
        let content_width = self.util.visible_width(content);
        if content_width >= width {
            return content.to_string();
        }
        let left = (width - content_width) / 2;
        let right = width - content_width - left;
        format!("{}{}{}", " ".repeat(left), content, " ".repeat(right))
    }
}
