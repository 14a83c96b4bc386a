//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 基于 LSB (最低有效位) 的 BMP 隐写工具：隐藏/恢复文本、执行可视化攻击并输出像素统计。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "基于 LSB (最低有效位) 的 BMP 隐写工具。文本逐 bit 写入 54 字节头部之后每个字节的最低位，并以一个全 0 字节结束；还可以生成可视化攻击图像并输出像素统计。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v 为 info，-vv 为 debug)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在 BMP 图像中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 生成只显示各通道最低位的可视化攻击图像。
    Attack(AttackArgs),

    /// 输出图像的像素统计信息。
    Stats(StatsArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的载体图像路径 (未压缩 BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 结果图像的输出路径，默认为载体旁边的 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复出的文本的保存路径，默认为 `recovered_<文件名主干>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'attack' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct AttackArgs {
    /// 要分析的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 攻击结果的输出路径，默认为 `attacked_<文件名主干>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'stats' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// 要统计的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
