use app::{AlgebrasCommand, AppHelper, AuthorsCommand, CheckCommand, Command, SolveCommand};

mod app;

fn main() {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "WABAsolver, a solver for weighted assumption-based argumentation.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AlgebrasCommand::new()),
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(SolveCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app.launch_app();
}
