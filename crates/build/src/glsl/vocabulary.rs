//! Reserved GLSL vocabulary
//!
//! Words in this module are never renamed by the minifier: language keywords,
//! builtin functions and types, numeric literals and anything carrying the
//! `gl_`/`GL_` builtin prefix.

use std::collections::HashSet;

/// Keywords, builtin functions and builtin types, sorted by byte order
pub const RESERVED_WORDS: &[&str] = &[
    "__FILE__", "__LINE__", "__VERSION__", "abs", "acos", "acosh", "active", "all", "any", "asin",
    "asinh", "asm", "atan", "atanh", "attribute", "binding", "bool", "break", "buffer", "bvec2",
    "bvec3", "bvec4", "case", "cast", "ceil", "centroid", "clamp", "class", "coherent", "common",
    "const", "continue", "cos", "cosh", "cross", "dFdx", "dFdy", "default", "degrees", "determinant",
    "discard", "distance", "do", "dot", "double", "dvec2", "dvec3", "dvec4", "else", "enum", "equal",
    "exp", "exp2", "extern", "external", "faceforward", "false", "filter", "fixed", "flat", "float",
    "floatBitsToInt", "floatBitsToUint", "floor", "for", "fract", "ftransform", "fvec2", "fvec3",
    "fvec4", "fwidth", "goto", "greaterThan", "greaterThanEqual", "half", "highp", "hvec2", "hvec3",
    "hvec4", "if", "iimage1D", "iimage1DArray", "iimage2D", "iimage2DArray", "iimage3D", "iimageBuffer",
    "iimageCube", "image1D", "image1DArray", "image1DArrayShadow", "image1DShadow", "image2D",
    "image2DArray", "image2DArrayShadow", "image2DShadow", "image3D", "imageBuffer", "imageCube",
    "imageLoad", "imageStore", "in", "inline", "inout", "input", "int", "intBitsToFloat", "interface",
    "invariant", "inverse", "inversesqrt", "isampler1D", "isampler1DArray", "isampler2D",
    "isampler2DArray", "isampler3D", "isamplerCube", "isinf", "isnan", "ivec2", "ivec3", "ivec4",
    "layout", "length", "lessThan", "lessThanEqual", "location", "log", "log2", "long", "lowp", "main",
    "mat2", "mat2x2", "mat2x3", "mat2x4", "mat3", "mat3x2", "mat3x3", "mat3x4", "mat4", "mat4x2",
    "mat4x3", "mat4x4", "matrixCompMult", "max", "mediump", "min", "mix", "mod", "modf", "namespace",
    "noinline", "noise1", "noise2", "noise3", "noise4", "noperspective", "normalize", "not", "notEqual",
    "out", "outerProduct", "output", "packed", "partition", "patch", "pow", "precise", "precision",
    "public", "radians", "readonly", "reflect", "refract", "restrict", "return", "round", "roundEven",
    "row_major", "sample", "sampler1D", "sampler1DArray", "sampler1DArrayShadow", "sampler1DShadow",
    "sampler2D", "sampler2DArray", "sampler2DArrayShadow", "sampler2DRect", "sampler2DRectShadow",
    "sampler2DShadow", "sampler3D", "sampler3DRect", "samplerBuffer", "samplerCube", "shadow1D",
    "shadow1DLod", "shadow1DProj", "shadow1DProjLod", "shadow2D", "shadow2DLod", "shadow2DProj",
    "shadow2DProjLod", "shared", "short", "sign", "sin", "sinh", "sizeof", "smooth", "smoothstep",
    "sqrt", "static", "std140", "std430", "step", "struct", "subroutine", "superp", "switch", "tan",
    "tanh", "template", "texelFetch", "texelFetchOffset", "texture", "texture1D", "texture1DLod",
    "texture1DProj", "texture1DProjLod", "texture2D", "texture2DLod", "texture2DProj",
    "texture2DProjLod", "texture3D", "texture3DLod", "texture3DProj", "texture3DProjLod", "textureCube",
    "textureCubeLod", "textureGather", "textureGrad", "textureGradOffset", "textureLod",
    "textureLodOffset", "textureOffset", "textureProj", "textureProjGrad", "textureProjGradOffset",
    "textureProjLod", "textureProjLodOffset", "textureProjOffset", "textureSize", "this", "transpose",
    "true", "trunc", "typedef", "uimage1D", "uimage1DArray", "uimage2D", "uimage2DArray", "uimage3D",
    "uimageBuffer", "uimageCube", "uint", "uintBitsToFloat", "uniform", "union", "unsigned",
    "usampler1D", "usampler1DArray", "usampler2D", "usampler2DArray", "usampler3D", "usamplerCube",
    "using", "uvec2", "uvec3", "uvec4", "varying", "vec2", "vec3", "vec4", "void", "volatile", "while",
    "writeonly",
];

/// Returns true for bytes that may appear in a GLSL identifier (`[A-Za-z0-9_]`)
pub fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Returns true if `word` starts with the builtin prefix, compared case-insensitively
pub fn has_builtin_prefix(word: &[u8]) -> bool {
    word.len() >= 3 && word[..3].eq_ignore_ascii_case(b"GL_")
}

/// Checks whether a word must be left untouched by the minifier
///
/// A word is reserved when it is a numeric literal (leading digit), when it
/// carries the `GL_` prefix in any letter case, or when it is listed in
/// [`RESERVED_WORDS`].
pub fn is_reserved(word: &[u8]) -> bool {
    match word.first() {
        None => false,
        Some(first) if first.is_ascii_digit() => true,
        Some(_) => has_builtin_prefix(word) || RESERVED_WORDS.binary_search_by(|entry| entry.as_bytes().cmp(word)).is_ok(),
    }
}

/// The builtin reserved words extended with project-specific names
///
/// Extra words typically come from the shader set manifest, e.g. names bound
/// by the host program that must keep their spelling.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    extra: HashSet<Vec<u8>>,
}

impl Vocabulary {
    /// Creates a vocabulary holding only the builtin words
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a vocabulary with additional reserved words
    pub fn with_extra<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra: words.into_iter().map(|w| w.as_ref().as_bytes().to_vec()).collect(),
        }
    }

    pub fn is_reserved(&self, word: &[u8]) -> bool {
        is_reserved(word) || self.extra.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_are_sorted() {
        for pair in RESERVED_WORDS.windows(2) {
            assert!(pair[0].as_bytes() < pair[1].as_bytes(), "{} must sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_keywords_and_builtins() {
        for word in ["uniform", "in", "out", "vec4", "void", "main", "texture", "sampler2D", "__VERSION__"] {
            assert!(is_reserved(word.as_bytes()), "{word} should be reserved");
        }
        for word in ["color", "pos", "vpos", "Main", "uniforms", "a"] {
            assert!(!is_reserved(word.as_bytes()), "{word} should not be reserved");
        }
    }

    #[test]
    fn test_numeric_and_prefix_rules() {
        assert!(is_reserved(b"0"));
        assert!(is_reserved(b"1e5"));
        assert!(is_reserved(b"0x1F"));
        assert!(is_reserved(b"gl_FragColor"));
        assert!(is_reserved(b"GL_ES"));
        assert!(is_reserved(b"gL_anything"));
        assert!(!is_reserved(b"gl"));
        assert!(!is_reserved(b"glow"));
        assert!(!is_reserved(b""));
    }

    #[test]
    fn test_identifier_bytes() {
        assert!(is_identifier_byte(b'a'));
        assert!(is_identifier_byte(b'Z'));
        assert!(is_identifier_byte(b'7'));
        assert!(is_identifier_byte(b'_'));
        assert!(!is_identifier_byte(b'.'));
        assert!(!is_identifier_byte(b' '));
        assert!(!is_identifier_byte(0xC3));
    }

    #[test]
    fn test_extra_words() {
        let vocabulary = Vocabulary::with_extra(["hostColor"]);
        assert!(vocabulary.is_reserved(b"hostColor"));
        assert!(vocabulary.is_reserved(b"vec3"));
        assert!(!vocabulary.is_reserved(b"color"));
        assert!(!Vocabulary::new().is_reserved(b"hostColor"));
    }
}
