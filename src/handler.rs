//! # 命令处理逻辑模块
//!
//! 包含 `hide`、`recover`、`attack` 和 `stats` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、按顺序调用核心算法、记录日志以及向用户报告结果。

use crate::bitplane::visual_attack;
use crate::capacity::{check_min_pixels, fits, usable_embed_bytes};
use crate::cli::{AttackArgs, HideArgs, RecoverArgs, StatsArgs};
use crate::constants::BMP_HEADER_SIZE;
use crate::statistics::{StatisticsReport, analyze};
use crate::steganography::{embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use image::ImageFormat;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 根据输入文件生成默认输出路径 (与输入位于同一目录)。
///
/// `extension` 为 `None` 时保留完整文件名，否则使用文件名主干并替换扩展名。
fn default_output(source: &Path, prefix: &str, extension: Option<&str>) -> Result<PathBuf> {
    let name = match extension {
        None => source.file_name(),
        Some(_) => source.file_stem(),
    }
    .with_context(|| {
        format!(
            "Cannot derive an output file name from: {}",
            source.to_string_lossy().red().bold()
        )
    })?;

    let mut file_name = OsString::from(prefix);
    file_name.push(name);
    if let Some(extension) = extension {
        file_name.push(".");
        file_name.push(extension);
    }
    Ok(source.with_file_name(file_name))
}

/// 覆盖保护：目标已存在且未指定 `--force` 时报错。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() {
        anyhow::ensure!(
            force,
            "Output file already exists: {}. \nUse --force to overwrite it.",
            path.to_string_lossy().red().bold()
        );
        warn!("Overwriting existing file: {}", path.display());
    }
    Ok(())
}

/// 读取图像尺寸并检查最小像素数。
fn ensure_min_size(path: &Path) -> Result<()> {
    let (width, height) = image::image_dimensions(path).with_context(|| {
        format!(
            "Unable to read image dimensions: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    let pixels = check_min_pixels(width, height)?;
    debug!("{} is {width}x{height} ({pixels} pixels)", path.display());
    Ok(())
}

/// 载体必须是未压缩的 BMP：对其他格式的原始字节做 LSB 写入会破坏压缩数据流。
fn ensure_bmp_carrier(path: &Path, picture: &[u8]) -> Result<()> {
    let format = image::guess_format(picture).with_context(|| {
        format!(
            "Unable to recognise the image format of: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    anyhow::ensure!(
        format == ImageFormat::Bmp,
        "Only uncompressed BMP carriers are supported, but {} is {:?}",
        path.to_string_lossy().red().bold(),
        format
    );
    Ok(())
}

fn read_image_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查图像尺寸与隐写空间、把文本写入像素字节的最低位，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件，或载体不是 BMP。
/// * 图像像素数过少，或没有足够的空间来隐藏文本。
/// * 文本中含有 NUL 字节，或载体实际长度不足。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = match args.dest {
        Some(dest) => dest,
        None => default_output(&args.image, "doctored_", None)?,
    };
    ensure_writable(&dest, args.force)?;

    let mut picture = read_image_bytes(&args.image)?;
    ensure_bmp_carrier(&args.image, &picture)?;

    let text = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    ensure_min_size(&args.image)?;

    anyhow::ensure!(
        fits(picture.len(), BMP_HEADER_SIZE, text.len()),
        "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
        (text.len() + 1).to_string().red().bold(),
        usable_embed_bytes(picture.len()).to_string().green().bold()
    );

    embed(&mut picture, &text).with_context(|| {
        format!(
            "Failed to hide the text in {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!(
        "Embedded {} bytes into {}",
        text.len(),
        args.image.display()
    );

    fs::write(&dest, picture).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、提取结束标记之前的全部字节，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件、载体不是 BMP，或图像像素数过少。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = match args.text {
        Some(text) => text,
        None => default_output(&args.image, "recovered_", Some("txt"))?,
    };
    ensure_writable(&dest, args.force)?;

    let picture = read_image_bytes(&args.image)?;
    ensure_bmp_carrier(&args.image, &picture)?;
    ensure_min_size(&args.image)?;

    let text = extract(&picture);
    if text.is_empty() {
        warn!("No hidden text found in {}", args.image.display());
    }
    info!(
        "Extracted {} bytes from {}",
        text.len(),
        args.image.display()
    );

    fs::write(&dest, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Attack' 命令的执行逻辑。
///
/// 解码图像，把每个通道的最低位放大为黑/白，并把结果保存为新图像。
///
/// # Errors
///
/// 图像无法解码、尺寸为 0、目标已存在 (未指定 `--force`) 或无法保存时返回错误。
pub fn handle_attack(args: AttackArgs) -> Result<()> {
    let dest = match args.dest {
        Some(dest) => dest,
        None => default_output(&args.image, "attacked_", Some("png"))?,
    };
    ensure_writable(&dest, args.force)?;

    let source = image::open(&args.image)
        .with_context(|| {
            format!(
                "Unable to decode image: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?
        .to_rgb8();

    let attacked = visual_attack(&source).with_context(|| {
        format!(
            "Error applying visual attack to {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("Visual attack applied to {}", args.image.display());

    attacked.save(&dest).with_context(|| {
        format!(
            "Unable to save attacked image: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The visual attack image has been saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 读取并统计一幅图像。
///
/// 返回像素统计报告以及按文件长度计算的可嵌入字节数，两者互不推导。
///
/// # Errors
///
/// 图像文件无法读取或解码时返回错误。
pub fn collect_stats(path: &Path) -> Result<(StatisticsReport, usize)> {
    let picture = read_image_bytes(path)?;

    let source = image::load_from_memory(&picture)
        .with_context(|| {
            format!(
                "Unable to decode image: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .to_rgb8();

    let report = analyze(Some(&source));
    if let StatisticsReport::Image(stats) = &report {
        debug!(
            "{} of 256 luma buckets occupied in {}",
            stats.unique_buckets,
            path.display()
        );
    }

    Ok((report, usable_embed_bytes(picture.len())))
}

/// 处理 'Stats' 命令的执行逻辑。
///
/// 输出像素统计，并另起一行给出按文件长度计算的可嵌入字节数 (两者是独立的量)。
///
/// # Errors
///
/// 图像文件无法读取或解码时返回错误。
pub fn handle_stats(args: StatsArgs) -> Result<()> {
    let (report, usable) = collect_stats(&args.image)?;

    println!("{}", report.to_string().cyan());
    println!(
        "Usable Embed Bytes (file length / 8): {}",
        usable.to_string().green().bold()
    );
    Ok(())
}
