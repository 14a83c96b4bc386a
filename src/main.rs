use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use bmp_lsb::{
    cli::{Cli, Commands},
    handler::{handle_attack, handle_hide, handle_recover, handle_stats},
};

/// 根据 `-v` 的次数初始化日志，`RUST_LOG` 环境变量仍然可以覆盖。
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Attack(args) => handle_attack(args),
        Commands::Stats(args) => handle_stats(args),
    }
}
