//! # 错误类型
//!
//! 核心算法 (容量、编解码、可视化攻击) 返回的所有错误都在这里定义。
//! 核心模块本身不记录日志，错误如何展示由调用方决定。

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 图像宽或高为 0，无法进行可视化攻击。
    #[error("Image dimensions must be positive (w,h > 0), got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// 载荷 (含结束标记) 超出了载体可用的字节数。
    #[error(
        "The message is too large to embed in this image. Available capacity: {available} bytes, needed: {needed} bytes"
    )]
    InsufficientCapacity { available: usize, needed: usize },

    /// 图像像素数低于结构上的最小要求。
    #[error("Image is too small to embed text: {pixels} pixels, at least {minimum} required")]
    ImageTooSmall { pixels: u64, minimum: u64 },

    /// 载体缓冲区比编解码器实际要访问的区域短。
    #[error("Carrier is {len} bytes long, but the steganographic region needs {required} bytes")]
    MalformedCarrier { len: usize, required: usize },

    /// 载荷中包含结束标记字节，解码时会在此处被截断。
    #[error(
        "The message contains a NUL byte at index {index}, which would end the hidden text early"
    )]
    EmbeddedTerminator { index: usize },
}
