// crates/meridian-cli/src/main.rs
//
// CLI entrypoint for Meridian Protocol developer tools.
//
// Drives a local in-memory token instance through a time-stepped scenario
// (mint, start-earning, rate updates from the models, claims) and exposes
// probes into the rate calculators and the math kernel.

use clap::{Parser, Subcommand};
use meridian_core::{Address, TokenEvent};
use meridian_math::{convert_from_basis_points, exponent, get_continuous_index, wad_ln};
use meridian_rates::{earner_rate, minter_rate, InMemoryRegistrar, StaticMinterGateway};
use meridian_token::TokenState;
use primitive_types::U256;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Meridian Protocol CLI — local simulation and rate probes.
#[derive(Parser, Debug)]
#[command(
    name = "meridian",
    version = "0.1.0",
    about = "Meridian Protocol developer tools — simulate the yield-bearing token locally"
)]
struct Cli {
    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Step a local token instance through an earning scenario.
    Simulate {
        /// Number of days to simulate.
        #[arg(long, default_value_t = 30)]
        days: u64,

        /// Present value minted to the earning account at day zero.
        #[arg(long, default_value_t = 1_000_000)]
        amount: u64,

        /// Present value reported as owed by active minters.
        #[arg(long, default_value_t = 10_000_000)]
        active_owed: u64,
    },

    /// Evaluate the earner-rate calculator for explicit inputs.
    Rates {
        /// Minter rate in basis points.
        #[arg(long, default_value_t = 500)]
        minter_rate: u32,

        /// Total present value owed by active minters.
        #[arg(long)]
        active_owed: u64,

        /// Total present value held by the earning cohort.
        #[arg(long)]
        earning_supply: u64,

        /// Governance cap on the earner rate, in basis points.
        #[arg(long, default_value_t = 1_000)]
        max_rate: u64,
    },

    /// Probe the continuous-index growth factor e^{r·t}.
    Growth {
        /// Yearly rate in basis points.
        #[arg(long)]
        rate: u32,

        /// Elapsed seconds.
        #[arg(long)]
        seconds: u32,
    },

    /// Probe the kernel exponent e^x.
    Exp {
        /// Argument in EXP_ONE (10^12) scale.
        x: u128,
    },

    /// Probe the signed natural log ln(x).
    Ln {
        /// Argument in WAD (10^18) scale.
        x: u128,
    },
}

/// One day of the simulation, as reported to the operator.
#[derive(Debug, Serialize, Tabled)]
struct SimulationRow {
    day: u64,
    index: u128,
    rate_bp: u32,
    earning_supply: u128,
    non_earning_supply: u128,
    total_supply: u128,
}

#[derive(Debug, Serialize, Tabled)]
struct RateRow {
    safe_bp: u32,
    extra_safe_bp: u32,
    effective_bp: u64,
}

fn earner() -> Address {
    let mut bytes = [0u8; 32];
    bytes[0] = 1;
    bytes
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { days, amount, active_owed } => {
            simulate(days, amount, active_owed, cli.json)?;
        }
        Commands::Rates { minter_rate, active_owed, earning_supply, max_rate } => {
            let safe = meridian_rates::safe_earner_rate(
                U256::from(active_owed),
                U256::from(earning_supply),
                minter_rate,
            )?;
            let extra = meridian_rates::extra_safe_earner_rate(
                U256::from(active_owed),
                U256::from(earning_supply),
                minter_rate,
            )?;
            let effective = meridian_rates::rate(
                U256::from(max_rate),
                minter_rate,
                U256::from(active_owed),
                U256::from(earning_supply),
            )?;
            let rows = [RateRow {
                safe_bp: safe,
                extra_safe_bp: extra,
                effective_bp: effective.as_u64(),
            }];
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", Table::new(&rows));
            }
        }
        Commands::Growth { rate, seconds } => {
            let delta = get_continuous_index(convert_from_basis_points(rate), seconds);
            println!("{delta}");
        }
        Commands::Exp { x } => {
            println!("{}", exponent(x));
        }
        Commands::Ln { x } => {
            println!("{}", wad_ln(x)?);
        }
    }

    Ok(())
}

/// Run the canonical one-earner scenario: governance defaults, a fixed
/// owed total, the host carrying the model's rate into the token daily.
fn simulate(days: u64, amount: u64, active_owed: u64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registrar = InMemoryRegistrar::new([9u8; 32]);
    let gateway = StaticMinterGateway::new(minter_rate(&registrar), U256::from(active_owed));

    let mut state = TokenState::new([9u8; 32], 0);
    state.mint(earner(), U256::from(amount), 0)?;
    state.start_earning(earner(), U256::from(amount), 0)?;

    let mut rows = Vec::new();
    for day in 0..=days {
        let now = day * 86_400;
        let earning_supply = state.total_earning_supply(now)?;
        let chosen = earner_rate(&registrar, &gateway, earning_supply)?;
        let rate_bp = chosen.min(U256::from(u32::MAX)).as_u32();
        let index = state.update_index(rate_bp, now)?;

        rows.push(SimulationRow {
            day,
            index,
            rate_bp,
            earning_supply: state.total_earning_supply(now)?.as_u128(),
            non_earning_supply: state.total_non_earning_supply().as_u128(),
            total_supply: state.total_supply(now)?.as_u128(),
        });
    }

    let claimed = state.claim(earner(), days * 86_400)?;
    let events: Vec<TokenEvent> = state.drain_events();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", Table::new(&rows));
    }
    println!("claimed interest: {claimed}");
    println!("events emitted: {}", events.len());
    Ok(())
}
