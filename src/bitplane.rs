//! # 可视化攻击 (位平面变换)
//!
//! 只保留每个通道的最低位并放大到满亮度：最低位为 1 的通道变为 255，否则为 0。
//! 隐藏过数据的区域在结果图中会呈现出明显的噪声纹理。

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::StegoError;

/// 把单个通道值映射为 `255 * (value & 1)`。
#[inline]
pub fn lsb_to_intensity(value: u8) -> u8 {
    (value & 1) * u8::MAX
}

/// 对整幅图像执行可视化攻击，返回一张同尺寸的新图像，输入不会被修改。
///
/// # Errors
///
/// 宽或高为 0 时返回 [`StegoError::InvalidDimensions`]。
pub fn visual_attack(image: &RgbImage) -> Result<RgbImage, StegoError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(StegoError::InvalidDimensions { width, height });
    }

    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let Rgb(channels) = *image.get_pixel(x, y);
        Rgb(channels.map(lsb_to_intensity))
    }))
}
