// Buffer related constants
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

// Progress related constants
// Controls how often progress is printed (in multiples of buffer size)
pub const PROGRESS_UPDATE_INTERVAL: u64 = 100;

// Provider defaults
pub const DEFAULT_PROVIDER: &str = "s3";
pub const DEFAULT_FS_ROOT: &str = "./storage";
pub const DEFAULT_OSS_ENDPOINT: &str = "https://oss-cn-hangzhou.aliyuncs.com";
pub const DEFAULT_MINIO_ENDPOINT: &str = "http://localhost:9000";

// Pre-signed links stay valid for an hour unless told otherwise
pub const DEFAULT_LINK_EXPIRATION_SECS: u64 = 3600;

pub const FOLDER_SEPARATOR: char = '/';
