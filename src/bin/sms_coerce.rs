//! Command-line front end for the SMS masquerade encoder.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use sms_masquerade::gateway::{self, GatewayPageRule};
use sms_masquerade::{coerce_plaintext, coerce_text, CoerceOptions, UnsupportedPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Replace,
    Ignore,
    Error,
    Pass,
}

impl From<PolicyArg> for UnsupportedPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Replace => UnsupportedPolicy::Replace,
            PolicyArg::Ignore => UnsupportedPolicy::Ignore,
            PolicyArg::Error => UnsupportedPolicy::Error,
            PolicyArg::Pass => UnsupportedPolicy::Pass,
        }
    }
}

/// Re-encode text so it survives a strict SMS gateway and renders
/// correctly on a modern phone.
#[derive(Debug, Parser)]
#[command(name = "sms-coerce", version, about)]
struct Args {
    /// Text to coerce. Reads from stdin if omitted.
    text: Option<String>,

    /// Maximum number of pages the beam search may emit.
    #[arg(long, default_value_t = 5)]
    max_pages: usize,

    /// Weight applied to truncated-grapheme length when scoring a layout.
    #[arg(long, default_value_t = 1)]
    truncation_weight: usize,

    /// How to handle graphemes containing an unsupported codepoint.
    #[arg(long, value_enum, default_value_t = PolicyArg::Replace)]
    policy: PolicyArg,

    /// Shorthand for `--policy error`: fail instead of producing a lossy
    /// best-effort result.
    #[arg(long, conflicts_with = "policy")]
    strict: bool,

    /// Use the lossy ASCII-only plaintext fallback instead of the UTF-16
    /// masquerade.
    #[arg(long)]
    plaintext: bool,

    /// Percent-encode the result, ready for the gateway's query parameter.
    #[arg(long)]
    url_encode: bool,

    /// Run the result through the reference gateway/phone pipeline and
    /// print what the handset would actually display.
    #[arg(long)]
    simulate_gateway: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let text = match args.text.clone() {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("error: failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let coerced = if args.plaintext {
        coerce_plaintext(&text)
    } else {
        let policy = if args.strict {
            UnsupportedPolicy::Error
        } else {
            args.policy.into()
        };
        let options = CoerceOptions {
            max_pages: args.max_pages,
            truncated_text_error_multiplier: args.truncation_weight,
            unsupported_policy: policy,
        };
        match coerce_text(&text, &options) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    };

    if args.simulate_gateway {
        let encoded = gateway::percent_encode(&coerced);
        match gateway::sms_api_endpoint(&encoded, GatewayPageRule::default()) {
            Ok(pages) => {
                println!("{} page(s) sent", pages.len());
                println!("{}", gateway::mobile_phone_render(&pages, true));
            }
            Err(e) => {
                eprintln!("error: gateway rejected the message: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if args.url_encode {
        println!("{}", gateway::percent_encode(&coerced));
    } else {
        println!("{coerced}");
    }

    ExitCode::SUCCESS
}
