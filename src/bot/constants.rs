// User-facing bot messages (HTML parse mode)
pub mod messages {
    pub const WELCOME: &str = "\
👋 <b>Welcome to Ultimate QR Code Generator!</b>\n\
\n\
I can create <b>customizable QR codes</b> with features like:\n\
<code>📱 URLs | 📞 Phone | 📧 Email | 📶 WiFi | 💬 SMS | 👤 vCard</code>\n\
\n\
🎨 <b>Features:</b>\n\
<code>• Multiple styles and colors</code>\n\
<code>• Custom logos in center</code>\n\
<code>• Text labels below QR</code>\n\
<code>• Error correction levels</code>\n\
<code>• Adjustable sizes</code>\n\
\n\
📌 <b>How to use:</b>\n\
<code>• Send /qr to start generating</code>\n\
<code>• Configure your QR code settings</code>\n\
<code>• Add optional logo &amp; label</code>\n\
<code>• Generate and download!</code>\n\
\n\
✨ Ready? Send <code>/qr</code> to begin!";

    pub const INITIAL_PROMPT: &str = "\
<b>📱 QR Code Generator</b>\n\
<b>━━━━━━━━━━━━━━━━━━━━━━</b>\n\
Send me the data you'd like to convert into a QR code.\n\
\n\
<b>✅ Supported Formats:</b>\n\
<code>• Plain text</code>\n\
<code>• Website URLs → https://example.com</code>\n\
<code>• Phone numbers → tel:+1234567890</code>\n\
<code>• Email addresses → mailto:email@example.com</code>\n\
<code>• WiFi credentials → WIFI:T:WPA;S:NetworkName;P:Password;;</code>\n\
<code>• SMS messages → smsto:+1234567890:Your message</code>\n\
<code>• vCard contact info</code>\n\
\n\
<b>🔢 Max Length:</b> <code>2953 characters</code>";

    pub const HELP: &str = "\
❓ <b>Help</b>\n\
\n\
<code>/qr</code> → start a new QR code\n\
<code>/start</code> → show the welcome message\n\
\n\
Configure size, error correction and style with the buttons, optionally \
add a centered logo and a caption label, then hit <b>Generate</b>.";

    pub const STYLE_PROMPT: &str =
        "<b>🎨 Select QR Code Style</b>\n\n<b>Choose a color scheme for your QR code:</b>";

    pub const LOGO_UPLOAD_PROMPT: &str = "\
<b>🖼️ Upload Logo Image</b>\n\
\n\
Send me an image to use as logo in QR code center.\n\
\n\
<b>✅ Best practices:</b>\n\
<code>• Use square or circular logos</code>\n\
<code>• High contrast with background</code>\n\
<code>• Simple designs work best</code>\n\
<code>• PNG with transparency recommended</code>\n\
<code>• Logo will be 25% of QR code size</code>\n\
\n\
<b>Choose shape or skip to continue without logo.</b>";

    pub const LOGO_SHAPE_PROMPT: &str =
        "<b>🔲 Select Logo Shape</b>\n\n<b>Choose how your logo should appear:</b>";

    pub const LABEL_PROMPT: &str = "\
<b>🏷️ Label Text</b>\n\
\n\
Send me the text to display below QR code.\n\
<b>Example:</b> <code>Scan Me, My Website, etc.</code>\n\
\n\
<b>Click 'Skip Label' to continue without label.</b>";

    pub const CANCELLED: &str = "<b>❌ QR code generation cancelled.</b>";

    pub const SESSION_EXPIRED: &str = "Session Expired Please Try Again";

    pub const INVALID_LOGO: &str =
        "<b>❌ That image could not be read.</b>\nLogo removed, back to settings.";

    pub const PAYLOAD_TOO_LARGE: &str = "\
<b>❌ Data too long for a QR code.</b>\n\
Try a lower error correction level or shorter data.";

    pub const GENERATION_FAILED: &str =
        "<b>⚠️ Something went wrong while generating.</b>\nPlease try again.";
}
