use anyhow::Ok;
use bmp_lsb::{
    capacity::fits,
    cli::{AttackArgs, HideArgs, RecoverArgs, StatsArgs},
    constants::BMP_HEADER_SIZE,
    handler::{collect_stats, handle_attack, handle_hide, handle_recover, handle_stats},
    statistics::StatisticsReport,
    steganography::{embed, extract},
};
use image::{ImageBuffer, Rgb};
use rand::{Rng, RngCore};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像 (格式由扩展名决定)
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(3))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgb([chunk[0], chunk[1], chunk[2]]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let hidden_image_path = dir.path().join("hidden.bmp");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        dest: Some(hidden_image_path.clone()),
        force: false,
    };
    handle_hide(hide_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 头部必须保持不变
    let original = fs::read(&original_image_path)?;
    let hidden = fs::read(&hidden_image_path)?;
    assert_eq!(original.len(), hidden.len());
    assert_eq!(original[..BMP_HEADER_SIZE], hidden[..BMP_HEADER_SIZE]);

    // 3. 测试 handle_recover
    let recover_args = RecoverArgs {
        image: hidden_image_path.clone(),
        text: Some(recovered_text_path.clone()),
        force: false,
    };
    handle_recover(recover_args)?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_recover_with_defaults() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_text_path, original_text)?;

    let hide_args = HideArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        dest: None,
        force: false,
    };
    handle_hide(hide_args)?;

    let expected_hidden_path = dir.path().join("doctored_original.bmp");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    let recover_args = RecoverArgs {
        image: expected_hidden_path,
        text: None,
        force: false,
    };
    handle_recover(recover_args)?;

    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 场景一：目标文件已存在，不使用 --force
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let hide_args_no_force = HideArgs {
        image: image_path.clone(),
        text: text_path.clone(),
        dest: Some(dest_path.clone()),
        force: false,
    };

    let result = handle_hide(hide_args_no_force);
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 场景二：使用 --force 强制覆盖
    let hide_args_with_force = HideArgs {
        image: image_path.clone(),
        text: text_path.clone(),
        dest: Some(dest_path.clone()),
        force: true,
    };

    let result = handle_hide(hide_args_with_force);
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    let overwritten = fs::read(&dest_path)?;
    assert_ne!(overwritten, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.bmp");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 10, 10);
    fs::write(&text_path, "a".repeat(5000))?;

    let hide_args = HideArgs {
        image: image_path,
        text: text_path,
        dest: Some(dest_path.clone()),
        force: false,
    };
    let result = handle_hide(hide_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists(), "Nothing should be written on failure.");

    Ok(())
}

/// 验证像素数低于最小值的图像会被拒绝
#[test]
fn test_handle_hide_image_too_small() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("tiny.bmp");
    let text_path = dir.path().join("text.txt");

    create_test_image(&image_path, 1, 3);
    fs::write(&text_path, "hi")?;

    let result = handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: None,
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Image is too small"));
    }

    Ok(())
}

/// 验证含有 NUL 字节的文本会被拒绝，而不是在恢复时被悄悄截断
#[test]
fn test_handle_hide_rejects_nul_bytes() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let text_path = dir.path().join("binary.txt");

    create_test_image(&image_path, 40, 40);
    fs::write(&text_path, b"before\0after")?;

    let result = handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: None,
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("NUL byte at index 6"));
    }

    Ok(())
}

/// 可视化攻击：输出尺寸不变，每个通道只可能是 0 或 255，且与原像素的最低位一致
#[test]
fn test_handle_attack() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("photo.bmp");
    create_test_image(&image_path, 32, 24);

    handle_attack(AttackArgs {
        image: image_path.clone(),
        dest: None,
        force: false,
    })?;

    let attacked_path = dir.path().join("attacked_photo.png");
    assert!(attacked_path.exists());

    let source = image::open(&image_path)?.to_rgb8();
    let attacked = image::open(&attacked_path)?.to_rgb8();
    assert_eq!(source.dimensions(), attacked.dimensions());
    for (src, out) in source.pixels().zip(attacked.pixels()) {
        for (s, o) in src.0.iter().zip(out.0) {
            assert_eq!(o, if s & 1 == 1 { 255 } else { 0 });
        }
    }

    // 第二次运行需要 --force
    let again = handle_attack(AttackArgs {
        image: image_path,
        dest: Some(attacked_path),
        force: false,
    });
    assert!(again.is_err());

    Ok(())
}

/// 统计报告：像素统计来自解码后的像素，可嵌入字节数来自文件长度
#[test]
fn test_handle_stats() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("stats.bmp");
    let mut img_buf = ImageBuffer::new(8, 8);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        *pixel = if (x + y) % 2 == 0 {
            Rgb([30u8, 0, 0])
        } else {
            Rgb([200, 100, 0])
        };
    }
    img_buf.save(&image_path)?;

    let (report, usable) = collect_stats(&image_path)?;
    let StatisticsReport::Image(stats) = report else {
        panic!("expected statistics for {:?}", image_path);
    };
    assert_eq!((stats.width, stats.height), (8, 8));
    assert_eq!(stats.pixel_count, 64);
    assert_eq!(stats.unique_buckets, 2);
    assert_eq!(stats.histogram[10], 32);
    assert_eq!(stats.histogram[100], 32);
    assert_eq!(stats.available_bits, 192);
    assert_eq!(usable, fs::read(&image_path)?.len() / 8);

    handle_stats(StatsArgs {
        image: image_path.clone(),
    })?;

    let missing = handle_stats(StatsArgs {
        image: dir.path().join("missing.bmp"),
    });
    assert!(missing.is_err());

    Ok(())
}

/// 压缩格式 (PNG) 的载体会被拒绝，而不是写出一个损坏的文件
#[test]
fn test_non_bmp_carrier_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("out.png");

    create_test_image(&image_path, 64, 64);
    fs::write(&text_path, "hidden in a png")?;

    let result = handle_hide(HideArgs {
        image: image_path.clone(),
        text: text_path,
        dest: Some(dest_path.clone()),
        force: false,
    });
    assert!(result.is_err(), "PNG carriers must be rejected.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Only uncompressed BMP carriers are supported"));
    }
    assert!(!dest_path.exists(), "Nothing should be written for a PNG carrier.");

    let result = handle_recover(RecoverArgs {
        image: image_path,
        text: None,
        force: false,
    });
    assert!(result.is_err(), "PNG carriers must be rejected on recovery too.");
    assert!(!dir.path().join("recovered_cover.txt").exists());

    Ok(())
}

/// 对随机载体和随机 (不含 0) 文本验证往返一致性
#[test]
fn test_random_round_trips() {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let payload_len = rng.random_range(0..200);
        let payload: Vec<u8> = (0..payload_len).map(|_| rng.random_range(1..=255)).collect();

        let extra = rng.random_range(0..64);
        let mut carrier = vec![0u8; BMP_HEADER_SIZE + 8 * (payload_len + 1) + extra];
        rng.fill_bytes(&mut carrier);
        let original = carrier.clone();

        assert!(fits(carrier.len(), BMP_HEADER_SIZE, payload_len));
        embed(&mut carrier, &payload).expect("payload should fit");
        assert_eq!(extract(&carrier), payload);

        assert_eq!(carrier[..BMP_HEADER_SIZE], original[..BMP_HEADER_SIZE]);
        assert!(carrier
            .iter()
            .zip(&original)
            .all(|(new, old)| (new ^ old) & 0xFE == 0));
    }
}
