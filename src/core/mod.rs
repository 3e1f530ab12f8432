// Core pipeline exports
pub mod decode;
pub mod encode;
pub mod matcher;

pub use decode::{decode_match, decode_matches, decode_stats};
pub use encode::{
    encode_balancing_coefficients, encode_helpee, encode_helpees, encode_helper, encode_helpers,
    encode_request,
};
pub use matcher::{Matcher, MatchingError, MatchingResult, Phase};
