pub const RETINAFACE_MODEL_NAME: &str = "RetinaFace_int.onnx";
pub const RETINAFACE_MODEL_URL: &str =
    "https://huggingface.co/amd/retinaface/resolve/main/weights/RetinaFace_int.onnx";

/// Name of the single input tensor of the RetinaFace graph.
pub const RETINAFACE_INPUT_NAME: &str = "RetinaFace::input_0";

/// Model offered by the manual download utility. Not used for detection.
pub const YUNET_MODEL_NAME: &str = "yunet.onnx";
pub const YUNET_MODEL_URL: &str = "https://huggingface.co/kc12700/yunet/resolve/main/yunet.onnx";

pub const DECODE_ENDPOINT_URL: &str = "https://qfja8lmauf.execute-api.us-east-1.amazonaws.com/dev";

/// Network input resolution, `(height, width)`.
pub const TARGET_HEIGHT: u32 = 608;
pub const TARGET_WIDTH: u32 = 640;

/// Per-channel means subtracted during normalization, in BGR order.
pub const BGR_MEAN: [f32; 3] = [104.0, 117.0, 123.0];

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_RETRIES: u32 = 1;

pub const BOX_LINE_WIDTH: u32 = 10;
pub const LABEL_FONT_PX: f32 = 16.0;
/// Distance between the label baseline and the top edge of its box.
pub const LABEL_BASELINE_OFFSET: i32 = 5;
pub const BOX_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Directory name used under the platform cache/config roots.
pub const APP_DIR_NAME: &str = "FaceLens";
