//! # bmp_lsb 库
//!
//! 本库包含 BMP 图像 LSB 隐写的核心逻辑：容量模型、编解码、可视化攻击与像素统计。
//! 核心模块都是不做 I/O 的纯函数，文件读写和结果展示由 `handler` 负责。

pub mod bitplane;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod statistics;
pub mod steganography;

pub use error::StegoError;
