/// BMP 文件的标准头部大小 (字节)。
/// 所有隐写操作都会跳过这个头部，从其后的字节开始。
pub const BMP_HEADER_SIZE: usize = 54;

/// 隐藏一个载荷字节所需的载体字节数。
/// 每个载体字节的最低位只存放 1 bit，因此一个 `u8` 需要 8 个载体字节。
pub const BITS_PER_PAYLOAD_BYTE: usize = 8;

/// 消息结束标记。解码时遇到第一个值为 0 的字节即停止。
pub const TERMINATOR: u8 = 0x00;

/// 嵌入或提取文本所需的最小像素数 (宽 × 高)。
pub const MIN_REQUIRED_PIXELS: u64 = 2 * 2;

/// 每个像素参与统计与可视化攻击的颜色通道数 (R, G, B)。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 亮度直方图的桶数。
pub const HISTOGRAM_BUCKETS: usize = 256;
