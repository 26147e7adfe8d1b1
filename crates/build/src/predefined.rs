//! Predefined shader sets.
//!
//! These tables list the engine's shader sources so the tools can run without
//! a manifest. Paths are relative to the project root.

/// Default directory holding shader sources
pub const DEFAULT_SOURCE_DIR: &str = "rsc/shaders";

/// Default directory receiving the generated headers
pub const DEFAULT_OUTPUT_DIR: &str = "src/engine/shaders";

/// File name of the generated uniform/attribute macro header
pub const DEFAULT_MACRO_HEADER: &str = "glDefs.h";

/// OpenGL programs as (vertex, fragment) source pairs
pub const PREDEFINED_GL_PROGRAMS: &[(&str, &str)] = &[
    // Interface rendering
    ("glGui.vert", "glGui.frag"),
    // Selection picking
    ("glSel.vert", "glSel.frag"),
];

/// Direct3D 11 shaders compiled with fxc
pub const PREDEFINED_HLSL_SHADERS: &[&str] = &["dxGuiVs.hlsl", "dxGuiPs.hlsl", "dxSelVs.hlsl", "dxSelPs.hlsl"];

/// Vulkan shaders compiled with glslc
pub const PREDEFINED_VULKAN_SHADERS: &[&str] = &["vkConv.comp", "vkGui.vert", "vkGui.frag", "vkSel.vert", "vkSel.frag"];
