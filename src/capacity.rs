//! # 容量模型
//!
//! 纯函数：判断载荷能否放进载体，以及载体提供多少可用字节。
//!
//! 注意 `usable_embed_bytes` 直接用整个文件长度除以 8，头部字节也被计算在内，
//! 而实际写入从头部之后才开始。为了与既有行为保持一致这里保留该算法，
//! 精确的写入跨度由 [`required_carrier_len`] 给出，`steganography::embed` 会额外校验它。

use crate::constants::{BITS_PER_PAYLOAD_BYTE, MIN_REQUIRED_PIXELS};
use crate::error::StegoError;

/// 载体可容纳的载荷字节数 (`carrier_len / 8`)。
pub fn usable_embed_bytes(carrier_len: usize) -> usize {
    carrier_len / BITS_PER_PAYLOAD_BYTE
}

/// 当且仅当 `payload_len + 1 <= carrier_len / 8` 时返回 `true`。
///
/// 额外的 1 个字节留给结束标记。头部字节也计入除数，因此不依赖 `header_size`；
/// 头部之后的实际写入跨度由 `steganography::embed` 通过 [`required_carrier_len`] 校验。
pub fn fits(carrier_len: usize, _header_size: usize, payload_len: usize) -> bool {
    payload_len
        .checked_add(1)
        .is_some_and(|needed| needed <= usable_embed_bytes(carrier_len))
}

/// 编码器实际会写到的载体长度：头部 + 载荷 + 结束标记。
pub fn required_carrier_len(header_size: usize, payload_len: usize) -> usize {
    payload_len
        .saturating_add(1)
        .saturating_mul(BITS_PER_PAYLOAD_BYTE)
        .saturating_add(header_size)
}

/// 与 [`fits`] 相同的判断，但在失败时给出具体数字。
///
/// 成功时返回可用字节数，调用方可以据此拼出 "available N bytes, needed M" 这样的提示。
///
/// # Errors
///
/// 载荷放不下时返回 [`StegoError::InsufficientCapacity`]。
pub fn check_capacity(
    carrier_len: usize,
    header_size: usize,
    payload_len: usize,
) -> Result<usize, StegoError> {
    let usable = usable_embed_bytes(carrier_len);
    if fits(carrier_len, header_size, payload_len) {
        Ok(usable)
    } else {
        Err(StegoError::InsufficientCapacity {
            available: usable,
            needed: payload_len.saturating_add(1),
        })
    }
}

/// 最小尺寸门槛：像素数不足 [`MIN_REQUIRED_PIXELS`] 的图像直接拒绝，与载荷大小无关。
///
/// # Errors
///
/// 像素数过少时返回 [`StegoError::ImageTooSmall`]。
pub fn check_min_pixels(width: u32, height: u32) -> Result<u64, StegoError> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels < MIN_REQUIRED_PIXELS {
        return Err(StegoError::ImageTooSmall {
            pixels,
            minimum: MIN_REQUIRED_PIXELS,
        });
    }
    Ok(pixels)
}
