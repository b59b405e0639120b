use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ray is parallel to the screen plane (pass.z == origin.z == {z})")]
    DegenerateRay { z: f64 },

    #[error("cannot normalize a vector whose largest component is {max}")]
    DegenerateNormalization { max: f64 },

    #[error("scene has no viewpoint")]
    MissingViewpoint,

    #[error("scene has no objects")]
    EmptyScene,

    #[error("scene has {count} objects, but at most {max} are allowed")]
    TooManyObjects { count: usize, max: usize },

    #[error("record {record}: failed to parse {field} from `{text}`")]
    Parse {
        record: usize,
        field: &'static str,
        text: String,
    },

    #[error("record {record} is truncated: expected {expected} fields, found {found}")]
    TruncatedRecord {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("a {width}x{height} image is too large to render")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to read scene file")]
    Io(#[from] std::io::Error),
}
