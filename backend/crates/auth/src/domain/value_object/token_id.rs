use kernel::id::Id;

/// Identifier minted per refresh token (`jti` claim).
///
/// Disambiguates concurrently issued refresh tokens for the same
/// account, e.g. multiple devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenMarker;
pub type TokenId = Id<TokenMarker>;
