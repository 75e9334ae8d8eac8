mod genesis_relay;
mod governance;
mod side_chain;
#[cfg(test)]
mod testing_tool;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use primitive_types::U256;
use xr_codec::TxArgs;
use xr_config::Config;
use xr_crypto::Account;
use xr_rpc_client::{AnchorClient, SideChainClient};

use genesis_relay::GenesisRelay;
use governance::GovernanceEngine;

struct ToolContext {
    config: Config,
    quorum: Vec<Account>,
    anchor: AnchorClient,
}

fn load_context(config_path: &str) -> Result<ToolContext> {
    let config = Config::load(config_path)?;
    let mut quorum = Vec::with_capacity(config.quorum.privkey_paths.len());
    for path in &config.quorum.privkey_paths {
        quorum.push(Account::from_file(path)?);
    }
    let anchor = AnchorClient::new(&config.anchor.rpc_url)?;
    Ok(ToolContext {
        config,
        quorum,
        anchor,
    })
}

fn register_side_chain(config_path: &str) -> Result<()> {
    let mut ctx = load_context(config_path)?;
    let side = ctx.config.side_chain.clone();
    let mut engine =
        GovernanceEngine::new(&mut ctx.anchor, &ctx.quorum, ctx.config.confirm.clone());
    engine.register(side.chain_id, side.router, &side.name, side.relay_contract)?;
    log::info!("side chain {} registration requested", side.chain_id);
    Ok(())
}

fn update_side_chain(config_path: &str) -> Result<()> {
    let mut ctx = load_context(config_path)?;
    let side = ctx.config.side_chain.clone();
    let mut engine =
        GovernanceEngine::new(&mut ctx.anchor, &ctx.quorum, ctx.config.confirm.clone());
    engine.update(side.chain_id, side.router, &side.name, side.relay_contract)?;
    log::info!("side chain {} updated", side.chain_id);
    Ok(())
}

fn quit_side_chain(config_path: &str) -> Result<()> {
    let mut ctx = load_context(config_path)?;
    let chain_id = ctx.config.side_chain.chain_id;
    let mut engine =
        GovernanceEngine::new(&mut ctx.anchor, &ctx.quorum, ctx.config.confirm.clone());
    engine.quit(chain_id)?;
    log::info!("side chain {} quit requested", chain_id);
    Ok(())
}

fn approve(config_path: &str, operation: &str) -> Result<()> {
    let mut ctx = load_context(config_path)?;
    let chain_id = ctx.config.side_chain.chain_id;
    let mut engine =
        GovernanceEngine::new(&mut ctx.anchor, &ctx.quorum, ctx.config.confirm.clone());
    let last = match operation {
        "register" => engine.approve_register(chain_id)?,
        "update" => engine.approve_update(chain_id)?,
        "quit" => engine.approve_quit(chain_id)?,
        other => unreachable!("unknown approve operation {}", other),
    };
    match last {
        Some(tx_hash) => log::info!(
            "side chain {} {} approved, final tx {:#x}",
            chain_id,
            operation,
            tx_hash
        ),
        None => log::info!(
            "side chain {} {} approval already held for every member",
            chain_id,
            operation
        ),
    }
    Ok(())
}

fn side_chain_status(config_path: &str) -> Result<()> {
    let mut ctx = load_context(config_path)?;
    let chain_id = ctx.config.side_chain.chain_id;
    let mut engine =
        GovernanceEngine::new(&mut ctx.anchor, &ctx.quorum, ctx.config.confirm.clone());
    match engine.side_chain(chain_id)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("side chain {} is not registered", chain_id),
    }
    Ok(())
}

fn sync_genesis(config_path: &str, epoch_height: Option<u32>) -> Result<()> {
    let mut ctx = load_context(config_path)?;
    let mut side = SideChainClient::new(&ctx.config.side_chain.rpc_url)?;
    let epoch_height = epoch_height.unwrap_or(ctx.config.anchor.epoch_height);
    let chain_id = ctx.config.side_chain.chain_id;
    let relay_contract = ctx.config.side_chain.relay_contract;

    let mut relay = GenesisRelay::new(
        &mut side,
        &mut ctx.anchor,
        &ctx.quorum,
        ctx.config.confirm.clone(),
    );
    relay.run(chain_id, relay_contract, epoch_height)?;
    log::info!("genesis state synchronized for side chain {}", chain_id);
    Ok(())
}

fn parse_epoch_height(value: Option<&str>) -> Result<Option<u32>> {
    value
        .map(|s| {
            s.parse()
                .with_context(|| format!("epoch height {:?} is not a block height", s))
        })
        .transpose()
}

fn dump_tx_args(data: &str) -> Result<()> {
    let bytes = hex::decode(data.trim_start_matches("0x")).context("tx args hex")?;
    let args = TxArgs::deserialize(&bytes)?;
    println!("asset_hash: 0x{}", hex::encode(&args.asset_hash));
    println!("address:    0x{}", hex::encode(&args.address));
    println!("amount:     {}", args.amount);
    Ok(())
}

fn encode_tx_args(asset_hash: &str, address: &str, amount: &str) -> Result<()> {
    let args = TxArgs {
        asset_hash: hex::decode(asset_hash.trim_start_matches("0x")).context("asset hash hex")?,
        address: hex::decode(address.trim_start_matches("0x")).context("address hex")?,
        amount: U256::from_dec_str(amount).context("decimal amount")?,
    };
    println!("0x{}", hex::encode(args.serialize()?));
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let arg_config_path = Arg::new("config-path")
        .short('c')
        .takes_value(true)
        .default_value("config.toml")
        .help("The config.toml file path");

    let mut app = Command::new("crossrelay tools")
        .about("Operator tools for the side chain / anchor chain bridge")
        .subcommand(
            Command::new("register-side-chain")
                .about("Request side chain registration on the anchor chain")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("approve-register")
                .about("Quorum-approve a pending side chain registration")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("update-side-chain")
                .about("Resubmit side chain metadata under owner authority")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("approve-update")
                .about("Quorum-approve a pending side chain update")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("quit-side-chain")
                .about("Request side chain deregistration")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("approve-quit")
                .about("Quorum-approve a pending side chain quit")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("side-chain-status")
                .about("Print the side chain's registration record")
                .arg(arg_config_path.clone()),
        )
        .subcommand(
            Command::new("sync-genesis")
                .about("Run the two-phase genesis relay between both chains")
                .arg(arg_config_path.clone())
                .arg(
                    Arg::new("epoch-height")
                        .short('e')
                        .takes_value(true)
                        .required(false)
                        .help("Anchor block height carrying the committee config, default from config"),
                ),
        )
        .subcommand(
            Command::new("dump-tx-args")
                .about("Decode hex-encoded cross-chain transfer args")
                .arg(
                    Arg::new("data")
                        .short('d')
                        .takes_value(true)
                        .required(true)
                        .help("Hex of the serialized tx args"),
                ),
        )
        .subcommand(
            Command::new("encode-tx-args")
                .about("Encode cross-chain transfer args to hex")
                .arg(
                    Arg::new("asset-hash")
                        .short('a')
                        .takes_value(true)
                        .required(true)
                        .help("Asset hash hex"),
                )
                .arg(
                    Arg::new("address")
                        .short('t')
                        .takes_value(true)
                        .required(true)
                        .help("Target address hex"),
                )
                .arg(
                    Arg::new("amount")
                        .short('m')
                        .takes_value(true)
                        .required(true)
                        .help("Decimal amount, below 2^255"),
                ),
        );

    let matches = app.clone().get_matches();
    let result = match matches.subcommand() {
        Some(("register-side-chain", m)) => {
            register_side_chain(m.value_of("config-path").unwrap())
        }
        Some(("approve-register", m)) => approve(m.value_of("config-path").unwrap(), "register"),
        Some(("update-side-chain", m)) => update_side_chain(m.value_of("config-path").unwrap()),
        Some(("approve-update", m)) => approve(m.value_of("config-path").unwrap(), "update"),
        Some(("quit-side-chain", m)) => quit_side_chain(m.value_of("config-path").unwrap()),
        Some(("approve-quit", m)) => approve(m.value_of("config-path").unwrap(), "quit"),
        Some(("side-chain-status", m)) => side_chain_status(m.value_of("config-path").unwrap()),
        Some(("sync-genesis", m)) => parse_epoch_height(m.value_of("epoch-height"))
            .and_then(|epoch_height| {
                sync_genesis(m.value_of("config-path").unwrap(), epoch_height)
            }),
        Some(("dump-tx-args", m)) => dump_tx_args(m.value_of("data").unwrap()),
        Some(("encode-tx-args", m)) => encode_tx_args(
            m.value_of("asset-hash").unwrap(),
            m.value_of("address").unwrap(),
            m.value_of("amount").unwrap(),
        ),
        _ => {
            app.print_help().expect("print help");
            return;
        }
    };
    if let Err(err) = result {
        log::error!("{:#}", err);
        std::process::exit(-1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epoch_height() {
        assert_eq!(parse_epoch_height(None).unwrap(), None);
        assert_eq!(parse_epoch_height(Some("42")).unwrap(), Some(42));
        assert!(parse_epoch_height(Some("forty-two")).is_err());
        assert!(parse_epoch_height(Some("-1")).is_err());
    }
}
