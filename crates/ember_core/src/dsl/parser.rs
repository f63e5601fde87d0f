//! Statement parser for the scene language.
//!
//! # Supported Syntax
//!
//! - `camera origin <x> <y> <z> aspect <ratio>;`
//! - `material <name> : Diffuse color <r> <g> <b>;`
//! - `material <name> : Metal color <r> <g> <b> fuzz <f>;`
//! - `material <name> : Dielectric ir <index>;`
//! - `sphere center <x> <y> <z> radius <r> material <name>;`
//!
//! Whitespace between tokens is insignificant and `//` starts a line comment.
//! Statements may appear in any order, except that a material must be declared
//! before a sphere uses it.

use ember_math::Vec3;

use super::lexer::{tokenize, Token, TokenKind};
use crate::error::{SceneError, SceneResult, SyntaxError};
use crate::scene::{Color, Material, Scene, SceneBuilder};

/// Parse scene text into a validated [`Scene`].
pub fn parse_scene(source: &str) -> SceneResult<Scene> {
    parse_into(source, SceneBuilder::new())
}

/// Parse scene text into an existing builder (used to carry a scene name).
pub(crate) fn parse_into(source: &str, mut builder: SceneBuilder) -> SceneResult<Scene> {
    let tokens = tokenize(source);
    let eof_line = source.lines().count().max(1);
    let mut parser = Parser::new(&tokens, eof_line);

    while let Some(token) = parser.next() {
        let line = token.line;
        match &token.kind {
            TokenKind::Word(keyword) => match keyword.as_str() {
                "camera" => parser.camera(&mut builder, line)?,
                "material" => parser.material(&mut builder, line)?,
                "sphere" => parser.sphere(&mut builder, line)?,
                other => {
                    return Err(SceneError::Syntax {
                        line,
                        kind: SyntaxError::UnknownStatement(other.to_string()),
                    })
                }
            },
            other => {
                return Err(SceneError::Syntax {
                    line,
                    kind: SyntaxError::UnknownStatement(other.to_string()),
                })
            }
        }
    }

    builder.build().map_err(|kind| SceneError::Validation {
        line: eof_line,
        kind,
    })
}

/// Cursor over a token stream.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof_line: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], eof_line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            eof_line,
        }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Take the next token or fail with "expected ..., found end of input".
    fn expect_any(&mut self, expected: &str) -> SceneResult<&'a Token> {
        let eof_line = self.eof_line;
        self.next().ok_or_else(|| SceneError::Syntax {
            line: eof_line,
            kind: SyntaxError::UnexpectedEof(expected.to_string()),
        })
    }

    fn expect_word(&mut self, expected: &str) -> SceneResult<(&'a str, usize)> {
        let token = self.expect_any(expected)?;
        match &token.kind {
            TokenKind::Word(word) => Ok((word.as_str(), token.line)),
            other => Err(unexpected(token.line, expected, other)),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> SceneResult<()> {
        let expected = format!("`{keyword}`");
        let token = self.expect_any(&expected)?;
        match &token.kind {
            TokenKind::Word(word) if word == keyword => Ok(()),
            other => Err(unexpected(token.line, &expected, other)),
        }
    }

    fn expect_punct(&mut self, punct: TokenKind) -> SceneResult<()> {
        let expected = format!("`{punct}`");
        let token = self.expect_any(&expected)?;
        if token.kind == punct {
            Ok(())
        } else {
            Err(unexpected(token.line, &expected, &token.kind))
        }
    }

    fn expect_number(&mut self) -> SceneResult<f32> {
        let (word, line) = self.expect_word("a number")?;
        match word.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(SceneError::Syntax {
                line,
                kind: SyntaxError::InvalidNumber(word.to_string()),
            }),
        }
    }

    fn expect_vec3(&mut self) -> SceneResult<Vec3> {
        let x = self.expect_number()?;
        let y = self.expect_number()?;
        let z = self.expect_number()?;
        Ok(Vec3::new(x, y, z))
    }

    fn expect_identifier(&mut self) -> SceneResult<&'a str> {
        let (word, line) = self.expect_word("a material name")?;
        if word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Ok(word)
        } else {
            Err(SceneError::Syntax {
                line,
                kind: SyntaxError::InvalidIdentifier(word.to_string()),
            })
        }
    }

    /// camera origin <f32> <f32> <f32> aspect <f32> ;
    fn camera(&mut self, builder: &mut SceneBuilder, line: usize) -> SceneResult<()> {
        self.expect_keyword("origin")?;
        let origin = self.expect_vec3()?;
        self.expect_keyword("aspect")?;
        let aspect = self.expect_number()?;
        self.expect_punct(TokenKind::Semicolon)?;

        builder
            .camera(origin, aspect)
            .map_err(|kind| SceneError::Validation { line, kind })
    }

    /// material <name> : <type> ;
    fn material(&mut self, builder: &mut SceneBuilder, line: usize) -> SceneResult<()> {
        let name = self.expect_identifier()?;
        self.expect_punct(TokenKind::Colon)?;

        let (kind, kind_line) = self.expect_word("a material type")?;
        let material = match kind {
            "Diffuse" => {
                self.expect_keyword("color")?;
                Material::diffuse(self.expect_color()?)
            }
            "Metal" => {
                self.expect_keyword("color")?;
                let albedo = self.expect_color()?;
                self.expect_keyword("fuzz")?;
                Material::metal(albedo, self.expect_number()?)
            }
            "Dielectric" => {
                self.expect_keyword("ir")?;
                Material::dielectric(self.expect_number()?)
            }
            other => {
                return Err(SceneError::Syntax {
                    line: kind_line,
                    kind: SyntaxError::UnknownMaterialType(other.to_string()),
                })
            }
        };
        self.expect_punct(TokenKind::Semicolon)?;

        builder
            .material(name, material)
            .map(|_| ())
            .map_err(|kind| SceneError::Validation { line, kind })
    }

    /// sphere center <f32> <f32> <f32> radius <f32> material <name> ;
    fn sphere(&mut self, builder: &mut SceneBuilder, line: usize) -> SceneResult<()> {
        self.expect_keyword("center")?;
        let center = self.expect_vec3()?;
        self.expect_keyword("radius")?;
        let radius = self.expect_number()?;
        self.expect_keyword("material")?;
        let material = self.expect_identifier()?;
        self.expect_punct(TokenKind::Semicolon)?;

        builder
            .sphere(center, radius, material)
            .map_err(|kind| SceneError::Validation { line, kind })
    }

    fn expect_color(&mut self) -> SceneResult<Color> {
        self.expect_vec3()
    }
}

fn unexpected(line: usize, expected: &str, found: &TokenKind) -> SceneError {
    SceneError::Syntax {
        line,
        kind: SyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
        },
    }
}
