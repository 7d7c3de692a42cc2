//! `mkprg` — generate a C64 .PRG file from the command line.

use std::num::ParseIntError;
use std::path::PathBuf;

use anyhow::Context;
use log::info;
use structopt::StructOpt;

use prg_rs::{generate_with, Payload, TargetConfig};

/// Parse a 16-bit address written as decimal, `0x` hex, or `$` hex.
fn parse_address(s: &str) -> Result<u16, ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("$")) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "mkprg", about = "Generate a Commodore 64 .PRG file")]
struct Opt {
    /// Output .PRG path.
    #[structopt(parse(from_os_str))]
    output: PathBuf,

    /// Message text (uppercase letters become screen codes).
    #[structopt(short, long, default_value = "HELLO, WORLD!")]
    message: String,

    /// Load address (decimal, 0x.., or $..).
    #[structopt(long, parse(try_from_str = parse_address), default_value = "0x0801")]
    load_address: u16,

    /// Emit a plain BASIC PRINT program instead of machine code.
    #[structopt(long)]
    print: bool,

    /// Omit the space between SYS and its address.
    #[structopt(long)]
    no_space: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let config = TargetConfig {
        load_address: opt.load_address,
        space_after_sys: !opt.no_space,
        ..TargetConfig::c64()
    };
    let payload = if opt.print {
        Payload::PrintLiteral {
            text: opt.message.clone(),
        }
    } else {
        Payload::MessageWaitKey {
            message: opt.message.clone(),
        }
    };

    let image = generate_with(config, &payload)
        .with_context(|| format!("generating program for {:?}", opt.message))?;
    image
        .write_to_file(&opt.output)
        .with_context(|| format!("writing {}", opt.output.display()))?;

    if let Some(entry) = image.entry() {
        info!("machine code entry at ${:04X}", entry);
    }
    println!("Created: {} ({} bytes)", opt.output.display(), image.len());
    Ok(())
}
