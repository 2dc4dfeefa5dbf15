//! User-facing lines for the binary. Prefixes are colored only when the
//! target stream is a terminal; plain result lines never carry a prefix.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Stream {
    Out,
    Err,
}

fn colored(stream: Stream) -> bool {
    match stream {
        Stream::Out => atty::is(atty::Stream::Stdout),
        Stream::Err => atty::is(atty::Stream::Stderr),
    }
}

fn emit(stream: Stream, prefix: &str, painted: String, msg: &str) {
    let prefix = if colored(stream) { painted } else { prefix.to_string() };
    match stream {
        Stream::Out => println!("{prefix} {msg}"),
        Stream::Err => eprintln!("{prefix} {msg}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Out, "info:", "info:".cyan().bold().to_string(), msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Out, "ok:", "ok:".green().bold().to_string(), msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Err, "warn:", "warn:".yellow().bold().to_string(), msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Err, "error:", "error:".red().bold().to_string(), msg);
}

/// A bare result line (a path, a flag) meant for scripts.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
