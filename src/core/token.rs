use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::schema::fragment::FragmentCategory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("nested braces are not allowed in '{0}'")]
    NestedBrace(String),
    #[error("unclosed brace in '{0}'")]
    UnclosedBrace(String),
    #[error("empty braces in '{0}'")]
    EmptyBraces(String),
    #[error("unmatched closing brace in '{0}'")]
    UnmatchedClose(String),
    #[error("unknown token '{{{token}}}' in '{source_text}'")]
    UnknownToken { token: String, source_text: String },
}

/// A fragment-backed placeholder. Each is filled by a weighted draw from
/// one fragment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentSlot {
    SpatialDescriptor,
    ArchitecturalFeature,
    Detail1,
    Detail2,
    DirectionDescriptor,
    AtmosphericDetail,
}

impl FragmentSlot {
    pub fn category(&self) -> FragmentCategory {
        match self {
            FragmentSlot::SpatialDescriptor => FragmentCategory::Spatial,
            FragmentSlot::ArchitecturalFeature => FragmentCategory::Architectural,
            FragmentSlot::Detail1 | FragmentSlot::Detail2 => FragmentCategory::Detail,
            FragmentSlot::DirectionDescriptor => FragmentCategory::Direction,
            FragmentSlot::AtmosphericDetail => FragmentCategory::Atmospheric,
        }
    }
}

/// The closed placeholder vocabulary of template token strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Modifier,
    ModifierAdj,
    ModifierDetail,
    Slot(FragmentSlot),
    Article,
    ArticleCap,
    Function,
}

impl Token {
    /// Every token, in the order they are documented.
    pub const ALL: [Token; 12] = [
        Token::Modifier,
        Token::ModifierAdj,
        Token::ModifierDetail,
        Token::Slot(FragmentSlot::SpatialDescriptor),
        Token::Slot(FragmentSlot::ArchitecturalFeature),
        Token::Slot(FragmentSlot::Detail1),
        Token::Slot(FragmentSlot::Detail2),
        Token::Slot(FragmentSlot::DirectionDescriptor),
        Token::Slot(FragmentSlot::AtmosphericDetail),
        Token::Article,
        Token::ArticleCap,
        Token::Function,
    ];

    /// The name written between braces.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Modifier => "Modifier",
            Token::ModifierAdj => "Modifier_Adj",
            Token::ModifierDetail => "Modifier_Detail",
            Token::Slot(FragmentSlot::SpatialDescriptor) => "Spatial_Descriptor",
            Token::Slot(FragmentSlot::ArchitecturalFeature) => "Architectural_Feature",
            Token::Slot(FragmentSlot::Detail1) => "Detail_1",
            Token::Slot(FragmentSlot::Detail2) => "Detail_2",
            Token::Slot(FragmentSlot::DirectionDescriptor) => "Direction_Descriptor",
            Token::Slot(FragmentSlot::AtmosphericDetail) => "Atmospheric_Detail",
            Token::Article => "Article",
            Token::ArticleCap => "Article_Cap",
            Token::Function => "Function",
        }
    }

    /// Case-sensitive lookup by brace name.
    pub fn from_name(name: &str) -> Option<Token> {
        Token::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Whether the token may appear in a room-name token string.
    pub fn allowed_in_name(&self) -> bool {
        !matches!(self, Token::Slot(_) | Token::ModifierDetail)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

/// A parsed piece of a token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A placeholder to substitute.
    Token(Token),
}

/// A template text parsed once into literal and token segments.
///
/// Serialized as its source text; deserializing parses it, so malformed
/// placeholders surface as RON errors at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenString {
    source: String,
    segments: Vec<Segment>,
}

impl TokenString {
    /// Parse a token string.
    ///
    /// Syntax:
    /// - `{Token_Name}` → `Segment::Token`, for names in [`Token::ALL`]
    /// - Everything else → `Segment::Literal`
    ///
    /// There is no brace escape.
    pub fn parse(input: &str) -> Result<TokenString, TokenError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '{' => {
                    if !literal_buf.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal_buf)));
                    }

                    let start = i + 1;
                    let mut end = start;
                    while end < len && chars[end] != '}' {
                        if chars[end] == '{' {
                            return Err(TokenError::NestedBrace(input.to_string()));
                        }
                        end += 1;
                    }
                    if end == len {
                        return Err(TokenError::UnclosedBrace(input.to_string()));
                    }

                    let name: String = chars[start..end].iter().collect();
                    if name.is_empty() {
                        return Err(TokenError::EmptyBraces(input.to_string()));
                    }
                    let token = Token::from_name(&name).ok_or_else(|| TokenError::UnknownToken {
                        token: name.clone(),
                        source_text: input.to_string(),
                    })?;
                    segments.push(Segment::Token(token));
                    i = end + 1;
                }
                '}' => return Err(TokenError::UnmatchedClose(input.to_string())),
                c => {
                    literal_buf.push(c);
                    i += 1;
                }
            }
        }

        if !literal_buf.is_empty() {
            segments.push(Segment::Literal(literal_buf));
        }

        Ok(TokenString {
            source: input.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Tokens in order of appearance, repeats included.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Token(t) => Some(*t),
            Segment::Literal(_) => None,
        })
    }

    pub fn contains(&self, token: Token) -> bool {
        self.tokens().any(|t| t == token)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.source.starts_with(prefix)
    }
}

impl TryFrom<String> for TokenString {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TokenString::parse(&value)
    }
}

impl From<TokenString> for String {
    fn from(value: TokenString) -> Self {
        value.source
    }
}

impl fmt::Display for TokenString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
