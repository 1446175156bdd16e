use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::enums::{EcClass, SizeClass, StyleClass};
use crate::session::QrSettings;

fn marked(selected: bool, display_name: &str, idle_label: &str) -> String {
    if selected {
        format!("✅ {}", display_name)
    } else {
        idle_label.to_string()
    }
}

// Cancel-only keyboard shown with the initial data prompt
pub fn cancel_only() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("❌ Cancel", "cancel")]])
}

// Settings view: size rows, error rows, style/logo/label entries, generate
pub fn settings(settings: &QrSettings) -> InlineKeyboardMarkup {
    let size_row = |classes: &[SizeClass]| {
        classes
            .iter()
            .map(|size| {
                InlineKeyboardButton::callback(
                    marked(*size == settings.size, size.display_name(), size.button_label()),
                    format!("size_{}", size),
                )
            })
            .collect::<Vec<_>>()
    };

    let error_row = |classes: &[EcClass]| {
        classes
            .iter()
            .map(|ec| {
                InlineKeyboardButton::callback(
                    marked(*ec == settings.error_correction, ec.display_name(), ec.button_label()),
                    format!("error_{}", ec),
                )
            })
            .collect::<Vec<_>>()
    };

    let logo_text = if settings.has_logo { "✅ Add Logo" } else { "✍ Add Logo" };
    let label_text = if settings.label.is_some() { "✅ Add Label" } else { "🔥 Add Label" };

    InlineKeyboardMarkup::new(vec![
        size_row(&[SizeClass::Small, SizeClass::Medium]),
        size_row(&[SizeClass::Large, SizeClass::Xlarge]),
        error_row(&[EcClass::Low, EcClass::Medium]),
        error_row(&[EcClass::High, EcClass::Max]),
        vec![InlineKeyboardButton::callback("🧠 Change Style", "change_style")],
        vec![
            InlineKeyboardButton::callback(logo_text, "add_logo"),
            InlineKeyboardButton::callback(label_text, "add_label"),
        ],
        vec![InlineKeyboardButton::callback("💥 Generate QR Code", "generate")],
    ])
}

// Style selection, current choice marked
pub fn styles(settings: &QrSettings) -> InlineKeyboardMarkup {
    let button = |style: StyleClass| {
        InlineKeyboardButton::callback(
            marked(style == settings.style, style.display_name(), style.button_label()),
            format!("style_{}", style),
        )
    };

    InlineKeyboardMarkup::new(vec![
        vec![button(StyleClass::Classic), button(StyleClass::Blue)],
        vec![button(StyleClass::Gradient), button(StyleClass::Dark)],
        vec![button(StyleClass::Green)],
        vec![InlineKeyboardButton::callback("⬅️ Back To Settings", "back_settings")],
    ])
}

// Logo entry: choose a shape first or skip entirely
pub fn logo_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("✅ Choose Shape", "choose_logo_shape")],
        vec![InlineKeyboardButton::callback("🔍 Skip Logo", "skip_logo")],
    ])
}

pub fn logo_shapes() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("⬜️ Square", "logo_square"),
            InlineKeyboardButton::callback("⭕️ Circle", "logo_circle"),
        ],
        vec![InlineKeyboardButton::callback("⏹ Rounded", "logo_rounded")],
        vec![InlineKeyboardButton::callback("◀️ Back To Settings", "back_settings")],
    ])
}

pub fn logo_photo() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("◀️ Skip Logo", "skip_logo")]])
}

pub fn label_prompt() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("◀️ Skip Label", "skip_label")]])
}
