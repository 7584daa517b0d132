mod download_tools;
pub(crate) use download_tools::*;

mod metadata_resolver;
pub(crate) use metadata_resolver::*;

mod search_backends;
pub(crate) use search_backends::*;

mod spotify_token_issuer;
pub(crate) use spotify_token_issuer::*;
