//! # LSB 编解码
//!
//! 从 [`BMP_HEADER_SIZE`] 之后开始，每个载体字节的最低位存放载荷的 1 bit，
//! 每个载荷字节按从低位到高位的顺序占用 8 个连续的载体字节。
//! 载荷之后再写入一个全 0 的结束字节，解码时据此判断消息结束。
//! 载体的头部以及每个字节的第 1~7 位都不会被改动。

use std::iter;

use crate::capacity::{check_capacity, required_carrier_len};
use crate::constants::{BITS_PER_PAYLOAD_BYTE, BMP_HEADER_SIZE, TERMINATOR};
use crate::error::StegoError;

const LSB_MASK: u8 = 0x01;
const KEEP_MASK: u8 = 0xFE;

/// 把 `payload` 及结束标记写入 `carrier` 的最低有效位 (原地修改)。
///
/// # Panics
///
/// 调用方必须事先确认 `carrier.len() >= required_carrier_len(BMP_HEADER_SIZE, payload.len())`。
/// 区域不足时直接 panic，而不会悄悄截断。
/// 载荷中若含 0 字节也会照写，但解码会在该处停止。需要校验时请使用 [`embed`]。
pub fn embed_unchecked(carrier: &mut [u8], payload: &[u8]) {
    let span = (payload.len() + 1) * BITS_PER_PAYLOAD_BYTE;
    let region = &mut carrier[BMP_HEADER_SIZE..BMP_HEADER_SIZE + span];

    let bits = payload
        .iter()
        .chain(iter::once(&TERMINATOR))
        .flat_map(|&byte| (0..BITS_PER_PAYLOAD_BYTE).map(move |bit| (byte >> bit) & LSB_MASK));

    for (slot, bit) in region.iter_mut().zip(bits) {
        *slot = (*slot & KEEP_MASK) | bit;
    }
}

/// [`embed_unchecked`] 的安全版本：先做全部校验，再写入。
///
/// # Errors
///
/// * 载荷含有结束标记字节时返回 [`StegoError::EmbeddedTerminator`]。
/// * 容量不足 (`payload.len() + 1 > carrier.len() / 8`) 时返回 [`StegoError::InsufficientCapacity`]。
/// * 容量检查通过但头部之后的实际空间不够时返回 [`StegoError::MalformedCarrier`]。
///
/// 任何错误发生时 `carrier` 都保持原样。
pub fn embed(carrier: &mut [u8], payload: &[u8]) -> Result<(), StegoError> {
    if let Some(index) = payload.iter().position(|&byte| byte == TERMINATOR) {
        return Err(StegoError::EmbeddedTerminator { index });
    }

    check_capacity(carrier.len(), BMP_HEADER_SIZE, payload.len())?;

    let required = required_carrier_len(BMP_HEADER_SIZE, payload.len());
    if carrier.len() < required {
        return Err(StegoError::MalformedCarrier {
            len: carrier.len(),
            required,
        });
    }

    embed_unchecked(carrier, payload);
    Ok(())
}

/// 从 `carrier` 中取出隐藏的字节序列。
///
/// 遇到第一个全 0 字节或载体结束时停止，末尾不足 8 个载体字节的残余部分会被丢弃。
/// 比头部还短的载体返回空序列。
pub fn extract(carrier: &[u8]) -> Vec<u8> {
    let Some(region) = carrier.get(BMP_HEADER_SIZE..) else {
        return Vec::new();
    };

    region
        .chunks_exact(BITS_PER_PAYLOAD_BYTE)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (bit, &slot)| byte | ((slot & LSB_MASK) << bit))
        })
        .take_while(|&byte| byte != TERMINATOR)
        .collect()
}

/// 以 UTF-8 解释 [`extract`] 的结果，非法序列用替换字符代替。
pub fn extract_text(carrier: &[u8]) -> String {
    String::from_utf8_lossy(&extract(carrier)).into_owned()
}
