use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "QR Code Generator Commands:")]
pub enum Command {
    #[command(description = "Start the bot and see welcome message")]
    Start,

    #[command(description = "Create a new QR code")]
    Qr,

    #[command(description = "Show help message")]
    Help,
}
