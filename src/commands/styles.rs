use crate::avatar::{AvatarStyle, DEFAULT_STYLE_ID, STYLES};

/// One catalog line, marking the default style.
pub fn format_style(style: &AvatarStyle) -> String {
    let marker = if style.id == DEFAULT_STYLE_ID {
        " (default)"
    } else {
        ""
    };
    format!(
        "  {}: {} - {}{}",
        style.id, style.name, style.description, marker
    )
}

/// Prints the avatar style catalog.
pub fn styles() {
    println!("Available avatar styles:");
    for style in STYLES {
        println!("{}", format_style(style));
    }
}
