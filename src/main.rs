use std::env;
use std::process;

mod app;
mod cli;

// Usage: echo <input_text> | your_program.sh -E <pattern>
fn main() {
    let args: Vec<String> = env::args().collect();

    let outcome = cli::parse_args(args)
        .map_err(anyhow::Error::from)
        .and_then(app::run);

    let code = match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("{err:#}");
            1
        }
    };
    process::exit(code);
}
