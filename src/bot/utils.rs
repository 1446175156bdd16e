// Formatting helpers for the settings view and generated-file caption.

use teloxide::types::InlineKeyboardMarkup;
use teloxide::utils::html;

use super::keyboards;
use crate::session::QrSettings;

const DATA_PREVIEW_LEN: usize = 50;

/// Settings summary plus its keyboard, built together so callers re-render
/// both from one snapshot.
pub fn settings_view(settings: &QrSettings) -> (String, InlineKeyboardMarkup) {
    (settings_message(settings), keyboards::settings(settings))
}

pub fn settings_message(settings: &QrSettings) -> String {
    let preview: String = settings.text.chars().take(DATA_PREVIEW_LEN).collect();
    let ellipsis = if settings.text.chars().count() > DATA_PREVIEW_LEN { "..." } else { "" };

    let mut extra = String::new();
    if settings.has_logo {
        if let Some(shape) = settings.logo_shape {
            extra.push_str(&format!("<b>Logo:</b> <code>{}</code>\n", shape.display_name()));
        }
    }
    if let Some(label) = &settings.label {
        extra.push_str(&format!("<b>Label:</b> <code>{}</code>\n", html::escape(label)));
    }

    format!(
        "<b>⚙️ QR Code Settings</b>\n\n\
         <b>Data:</b> <code>{}{}</code>\n\
         <b>Size:</b> <code>📄 {}</code>\n\
         <b>Error Correction:</b> <code>{}</code>\n\
         <b>Style:</b> <code>{}</code>\n\
         {}\n\
         <b>Configure your QR code and click 'Generate'!</b>",
        html::escape(&preview),
        ellipsis,
        settings.size.display_name(),
        settings.error_correction.class_label(),
        settings.style.display_name(),
        extra,
    )
}

pub fn generated_caption(settings: &QrSettings) -> String {
    format!(
        "<b>✅ QR Code Generated</b>\n\n\
         <b>Size:</b> <code>📄 {}</code>\n\
         <b>Style:</b> <code>{}</code>\n\
         <b>Error Correction:</b> <code>{}</code>",
        settings.size.display_name(),
        settings.style.display_name(),
        settings.error_correction.class_label(),
    )
}
