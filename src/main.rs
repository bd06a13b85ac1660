/*
 * primeshare: Shamir threshold secret sharing over prime fields
 * Copyright (C) 2024 The primeshare Authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::{
    error::Error as StdError,
    fs::File,
    io,
    io::{prelude::*, BufReader},
};

use anyhow::{anyhow, bail, Context, Error};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;
use num_bigint::{BigInt, BigUint};
use num_traits::Num;

extern crate primeshare_core;
use primeshare_core::{Scheme, Share, SHARE_MULTIBASE};

fn threshold_arg() -> Arg {
    Arg::new("threshold")
        .short('k')
        .long("threshold")
        .value_name("THRESHOLD")
        .help("Number of shares required to recover the secret (must not be larger than --shares).")
        .action(ArgAction::Set)
        .required(true)
}

fn prime_arg() -> Arg {
    Arg::new("prime")
        .short('p')
        .long("prime")
        .value_name("PRIME")
        .help(r#"Prime modulus of the field, in decimal or "0x"-prefixed hexadecimal (defaults to the 256-bit prime 2^256 - 2^32 - 977). The same prime must be used for splitting and recovery."#)
        .action(ArgAction::Set)
}

fn shares_input_arg() -> Arg {
    Arg::new("shares")
        .short('s')
        .long("share")
        .value_name("SHARE PATH")
        .help(r#"Path to each share ("-" to read from stdin)."#)
        .action(ArgAction::Append)
        .allow_hyphen_values(true)
        .required(true)
}

fn parse_integer(value: &str) -> Result<BigInt, Error> {
    let value = value.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, value),
    };
    let (radix, body) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    // The sign has already been consumed, so a second one is malformed input.
    if body.starts_with(&['+', '-'][..]) {
        bail!("'{}' is not an integer", value);
    }
    let magnitude = BigInt::from(
        BigUint::from_str_radix(body, radix)
            .with_context(|| format!("'{}' is not an integer", value))?,
    );
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_u32(matches: &ArgMatches, name: &str) -> Result<u32, Error> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("required --{} argument not provided", name))?
        .parse()
        .with_context(|| format!("--{} argument was not an unsigned integer", name))
}

// Recovery does not care how many shares were originally dealt, so callers
// that only consume shares pass None and get an (n = k) scheme.
fn scheme_from_args(matches: &ArgMatches, shares: Option<u32>) -> Result<Scheme, Error> {
    let threshold = parse_u32(matches, "threshold")?;
    let shares = shares.unwrap_or(threshold);
    let scheme = match matches.get_one::<String>("prime") {
        None => Scheme::new(threshold, shares),
        Some(prime) => {
            let prime = parse_integer(prime)
                .context("--prime argument was not an integer")?
                .to_biguint()
                .context("--prime argument must be positive")?;
            Scheme::with_prime(threshold, shares, prime)
        }
    }
    .context("invalid scheme parameters")?;
    info!(
        "using a ({}, {}) scheme over a {}-bit prime",
        scheme.threshold(),
        scheme.shares(),
        scheme.prime().bits()
    );
    Ok(scheme)
}

fn read_line<R: BufRead + ?Sized>(input: &mut R) -> Result<String, Error> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no lines read");
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

// stdin is passed in (rather than opened here) so that several "-" paths
// consume consecutive lines of the same buffered stream.
fn read_oneline_file(
    prompt: &str,
    path_or_stdin: &str,
    stdin: &mut dyn BufRead,
) -> Result<String, Error> {
    if path_or_stdin == "-" {
        eprint!("{}: ", prompt);
        io::stderr().flush()?;
        read_line(stdin)
    } else {
        let file = File::open(path_or_stdin)
            .with_context(|| format!("failed to open file '{}'", path_or_stdin))?;
        read_line(&mut BufReader::new(file))
    }
}

fn read_shares(
    matches: &ArgMatches,
    scheme: &Scheme,
    stdin: &mut dyn BufRead,
) -> Result<Vec<Share>, Error> {
    matches
        .get_many::<String>("shares")
        .context("required --share argument not provided")?
        .enumerate()
        .map(|(idx, path)| {
            let text = read_oneline_file(&format!("Share {} Data", idx + 1), path, stdin)
                .with_context(|| format!("read share {}", idx + 1))?;
            Share::from_wire_multibase(text, scheme.prime())
                .with_context(|| format!("decode share {}", idx + 1))
        })
        .collect()
}

fn print_share(share: &Share, scheme: &Scheme, title: &str) -> Result<(), Error> {
    println!("----- BEGIN {} -----", title);
    println!("Share-X: {}", share.x());
    println!("Threshold: {}", scheme.threshold());
    println!(
        "\n{}",
        share
            .to_wire_multibase(SHARE_MULTIBASE, scheme.prime())
            .context("encode share")?
    );
    println!("----- END {} -----", title);
    Ok(())
}

// primeshare split --threshold <K> --shares <N> [--prime <P>] INPUT
fn split_cli() -> Command {
    Command::new("split")
        .about("Split a secret integer into shares.")
        .arg(threshold_arg())
        .arg(
            Arg::new("shares")
                .short('n')
                .long("shares")
                .value_name("NUM SHARES")
                .help("Number of shares to create (must not be smaller than --threshold).")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(prime_arg())
        .arg(
            Arg::new("INPUT")
                .help(r#"Path to file containing the secret as a decimal or "0x"-prefixed hexadecimal integer ("-" to read from stdin)."#)
                .action(ArgAction::Set)
                .allow_hyphen_values(true)
                .required(true)
                .index(1),
        )
}

fn split(matches: &ArgMatches) -> Result<(), Error> {
    let num_shares = parse_u32(matches, "shares")?;
    let scheme = scheme_from_args(matches, Some(num_shares))?;
    let input_path = matches
        .get_one::<String>("INPUT")
        .context("required INPUT argument not provided")?;

    let secret = parse_integer(
        &read_oneline_file("Secret", input_path, &mut io::stdin().lock())
            .context("read secret")?,
    )
    .context("parse secret")?;
    let secret = scheme
        .validate_secret(&secret)
        .context("validate secret")?;

    let shares = scheme.split_secret(&secret).context("splitting secret")?;
    for (i, share) in shares.iter().enumerate() {
        print_share(
            share,
            &scheme,
            &format!("SHARE {} OF {}", i + 1, shares.len()),
        )?;
    }

    Ok(())
}

// primeshare reconstruct --threshold <K> [--prime <P>] (--share <SHARE>)... OUTPUT
fn reconstruct_cli() -> Command {
    Command::new("reconstruct")
        .about("Recover a secret integer from a quorum of shares.")
        .arg(threshold_arg())
        .arg(prime_arg())
        .arg(shares_input_arg())
        .arg(
            Arg::new("OUTPUT")
                .help(r#"Path to write the recovered secret to ("-" to write to stdout)."#)
                .action(ArgAction::Set)
                .allow_hyphen_values(true)
                .required(true)
                .index(1),
        )
}

fn reconstruct(matches: &ArgMatches) -> Result<(), Error> {
    let scheme = scheme_from_args(matches, None)?;
    let output_path = matches
        .get_one::<String>("OUTPUT")
        .context("required OUTPUT argument not provided")?;

    let shares = read_shares(matches, &scheme, &mut io::stdin().lock())?;
    let secret = scheme
        .reconstruct_secret(&shares)
        .context("recovering secret")?;

    let (mut stdout_writer, mut file_writer);
    let output_file: &mut dyn Write = if output_path == "-" {
        stdout_writer = io::stdout();
        &mut stdout_writer
    } else {
        file_writer = File::create(output_path)
            .with_context(|| format!("failed to open output file '{}' for writing", output_path))?;
        &mut file_writer
    };

    writeln!(output_file, "{}", secret).context("write secret to file")?;

    Ok(())
}

// primeshare recreate --threshold <K> [--prime <P>] --x <X> (--share <SHARE>)...
fn recreate_cli() -> Command {
    Command::new("recreate")
        .about("Re-create the share with a given x-coordinate from a quorum of shares. This is useful when a share holder has lost their share, since the re-created share is identical to the original.")
        .arg(threshold_arg())
        .arg(prime_arg())
        .arg(shares_input_arg())
        .arg(
            Arg::new("x")
                .short('x')
                .long("x")
                .value_name("X")
                .help("x-coordinate of the share to re-create (must be non-zero).")
                .action(ArgAction::Set)
                .required(true),
        )
}

fn recreate(matches: &ArgMatches) -> Result<(), Error> {
    let scheme = scheme_from_args(matches, None)?;
    let x: BigUint = matches
        .get_one::<String>("x")
        .context("required --x argument not provided")?
        .parse()
        .context("--x argument was not an unsigned integer")?;

    let shares = read_shares(matches, &scheme, &mut io::stdin().lock())?;
    let share = scheme
        .recreate_share(&shares, &x)
        .context("re-creating share")?;

    print_share(&share, &scheme, "SHARE")
}

fn cli() -> Command {
    Command::new("primeshare")
        .version("0.0.0")
        .author("The primeshare Authors")
        .about("Split and recover secrets with Shamir's threshold secret sharing.")
        // primeshare split --threshold <K> --shares <N> [--prime <P>] INPUT
        .subcommand(split_cli())
        // primeshare reconstruct --threshold <K> [--prime <P>] (--share <SHARE>)... OUTPUT
        .subcommand(reconstruct_cli())
        // primeshare recreate --threshold <K> [--prime <P>] --x <X> (--share <SHARE>)...
        .subcommand(recreate_cli())
}

fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::init();

    let mut app = cli();

    let ret = match app.get_matches_mut().subcommand() {
        Some(("split", sub_matches)) => split(sub_matches),
        Some(("reconstruct", sub_matches)) => reconstruct(sub_matches),
        Some(("recreate", sub_matches)) => recreate(sub_matches),
        Some((subcommand, _)) => {
            // We should never end up here.
            app.print_help()?;
            Err(anyhow!("unknown subcommand '{}'", subcommand))
        }
        None => {
            app.print_help()?;
            Err(anyhow!("no subcommand specified"))
        }
    }?;

    Ok(ret)
}

#[test]
fn verify_cli() {
    cli().debug_assert();
}
