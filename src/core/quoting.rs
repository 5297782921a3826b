// src/core/quoting.rs

//! Shell quoting for argument lists.
//!
//! Every token is quoted on its own, so that when the target interpreter
//! re-tokenizes the joined line it yields exactly the original tokens.

/// The quoting rules of a command interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `sh`, `bash` and friends.
    Posix,
    /// `cmd.exe`, feeding a program that splits its command line with the MSVC rules.
    WindowsCmd,
    /// `cmd.exe` running a batch file. The batch re-parses its arguments when it
    /// expands `%*`, so the caret layer is applied twice.
    WindowsBatch,
}

impl Dialect {
    /// The dialect of the shell the launcher runs commands through on this platform.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::WindowsCmd
        } else {
            Self::Posix
        }
    }
}

/// Characters a POSIX shell would interpret outside of quotes.
const POSIX_META: &str = "#!\"$&'()*,:;<=>?[\\]^`{|}~";

/// Punctuation `cmd.exe` passes through untouched.
const WINDOWS_SAFE_PUNCT: &str = "-_.:/\\=@+";

/// Characters `cmd.exe` interprets unless prefixed with `^`.
const WINDOWS_META: &str = "()[]%!^\"`<>&|;, *?\t";

/// Quotes every argument for `dialect` and joins them with single spaces.
pub fn quote<S: AsRef<str>>(args: &[S], dialect: Dialect) -> String {
    args.iter()
        .map(|arg| quote_arg(arg.as_ref(), dialect))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quotes a single argument so the interpreter reads it back as one token.
pub fn quote_arg(arg: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Posix => quote_posix(arg),
        Dialect::WindowsCmd => quote_windows(arg, 1),
        Dialect::WindowsBatch => quote_windows(arg, 2),
    }
}

fn quote_posix(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    let needs_wrapping = arg
        .chars()
        .any(|c| c == '"' || c.is_whitespace() || c.is_control());

    if needs_wrapping && !arg.contains('\'') {
        // Nothing is special between single quotes.
        return format!("'{}'", arg);
    }

    if needs_wrapping || arg.contains('\'') {
        let mut quoted = String::with_capacity(arg.len() + 8);
        quoted.push('"');
        for c in arg.chars() {
            match c {
                '"' | '\\' | '$' | '`' => {
                    quoted.push('\\');
                    quoted.push(c);
                }
                // Step outside the quotes: `\!` inside them keeps its backslash.
                '!' => quoted.push_str("\"\\!\""),
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        return quoted;
    }

    let mut escaped = String::with_capacity(arg.len() * 2);
    for c in arg.chars() {
        if POSIX_META.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn is_windows_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || WINDOWS_SAFE_PUNCT.contains(c)
}

fn quote_windows(arg: &str, cmd_passes: usize) -> String {
    if !arg.is_empty() && arg.chars().all(is_windows_safe) {
        return arg.to_string();
    }

    // First the MSVC argv layer: backslashes only matter in front of a quote.
    let mut argv = String::with_capacity(arg.len() + 8);
    argv.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                argv.push_str(&"\\".repeat(backslashes * 2 + 1));
                argv.push('"');
                backslashes = 0;
            }
            _ => {
                argv.push_str(&"\\".repeat(backslashes));
                argv.push(c);
                backslashes = 0;
            }
        }
    }
    argv.push_str(&"\\".repeat(backslashes * 2));
    argv.push('"');

    // Then one cmd layer per parse, including the quotes that wrap the token.
    (0..cmd_passes).fold(argv, |line, _| caret_escape(&line))
}

fn caret_escape(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len() * 2);
    for c in line.chars() {
        if WINDOWS_META.contains(c) {
            escaped.push('^');
        }
        escaped.push(c);
    }
    escaped
}
