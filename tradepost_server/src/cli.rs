use crate::config;

/// There is no real CLI for the server. Any argument at all prints the usage text and the current configuration
/// environment, and the caller exits instead of starting up.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = std::env::args().count() > 1;
    if has_cli_args {
        println!("\n{}\n", include_str!("./cli-help.txt"));
        config::print_env_summary();
    }
    has_cli_args
}
