//! Shader source preprocessing.
//!
//! Every program lives in a single WGSL file split into stages by marker
//! lines:
//!
//! ```text
//! #include constants      <- prelude, copied into both stages
//! struct VertexOutput { .. }
//! #vert
//! @vertex fn vs_main(..) { .. }
//! #frag
//! @fragment fn fs_main(..) { .. }
//! ```
//!
//! `#include <name>` is replaced by a source registered in the
//! [`ShaderLibrary`]. Inclusion is one level deep: included sources may not
//! contain directives of their own. The two resulting stages are compiled as
//! separate shader modules by the pipeline builder.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ShaderError;
use crate::shading;

const VERT: &str = "#vert";
const FRAG: &str = "#frag";
const INCLUDE: &str = "#include";

/// The two compilation units of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStages {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

/// The shader programs shipped with the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    Board,
    Pieces,
    Overlay,
    Loading,
    Fade,
}

impl Program {
    pub const ALL: [Program; 5] = [
        Program::Board,
        Program::Pieces,
        Program::Overlay,
        Program::Loading,
        Program::Fade,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Program::Board => "board",
            Program::Pieces => "pieces",
            Program::Overlay => "overlay",
            Program::Loading => "loading",
            Program::Fade => "fade",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Program::Board => include_str!("shaders/board.wgsl"),
            Program::Pieces => include_str!("shaders/pieces.wgsl"),
            Program::Overlay => include_str!("shaders/overlay.wgsl"),
            Program::Loading => include_str!("shaders/loading.wgsl"),
            Program::Fade => include_str!("shaders/fade.wgsl"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Prelude,
    Vertex,
    Fragment,
}

/// Registry of includable sources.
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    includes: HashMap<String, String>,
}

impl Default for ShaderLibrary {
    /// A library with the application's shared sources: `constants`,
    /// `lighting` and `camera`.
    fn default() -> Self {
        let mut library = Self::empty();
        library.register("constants", shading::wgsl_constants());
        library.register("lighting", include_str!("shaders/lighting.wgsl"));
        library.register("camera", include_str!("shaders/camera.wgsl"));
        library
    }
}

impl ShaderLibrary {
    pub fn empty() -> Self {
        Self {
            includes: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.includes.insert(name.into(), source.into());
    }

    /// Preprocesses one of the shipped programs.
    pub fn program(&self, program: Program) -> Result<ShaderStages, ShaderError> {
        self.preprocess(program.label(), program.source())
    }

    /// Splits `source` into vertex and fragment units, expanding includes.
    pub fn preprocess(&self, label: &str, source: &str) -> Result<ShaderStages, ShaderError> {
        let mut prelude = String::new();
        let mut vertex: Option<String> = None;
        let mut fragment: Option<String> = None;
        let mut section = Section::Prelude;

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            let mut words = line.split_whitespace();
            let directive = words.next().unwrap_or_default();

            match directive {
                VERT | FRAG => {
                    let (slot, next, marker) = if directive == VERT {
                        (&mut vertex, Section::Vertex, VERT)
                    } else {
                        (&mut fragment, Section::Fragment, FRAG)
                    };
                    if slot.is_some() {
                        return Err(ShaderError::DuplicateStage {
                            program: label.to_string(),
                            marker,
                            line: line_number,
                        });
                    }
                    *slot = Some(String::new());
                    section = next;
                }
                INCLUDE => {
                    let name = words
                        .next()
                        .unwrap_or_default()
                        .trim_matches(|c: char| c == '<' || c == '>' || c == '"');
                    let included = self.resolve(label, name, line_number)?;
                    let target = Self::target(section, &mut prelude, &mut vertex, &mut fragment);
                    target.push_str(included);
                    if !included.ends_with('\n') {
                        target.push('\n');
                    }
                }
                _ => {
                    let target = Self::target(section, &mut prelude, &mut vertex, &mut fragment);
                    target.push_str(line);
                    target.push('\n');
                }
            }
        }

        let missing = |marker| ShaderError::MissingStage {
            program: label.to_string(),
            marker,
        };
        let vertex = vertex.ok_or_else(|| missing(VERT))?;
        let fragment = fragment.ok_or_else(|| missing(FRAG))?;

        debug!(program = label, "preprocessed shader");
        Ok(ShaderStages {
            label: label.to_string(),
            vertex: format!("{prelude}{vertex}"),
            fragment: format!("{prelude}{fragment}"),
        })
    }

    fn target<'s>(
        section: Section,
        prelude: &'s mut String,
        vertex: &'s mut Option<String>,
        fragment: &'s mut Option<String>,
    ) -> &'s mut String {
        match section {
            Section::Prelude => prelude,
            Section::Vertex => vertex.get_or_insert_with(String::new),
            Section::Fragment => fragment.get_or_insert_with(String::new),
        }
    }

    fn resolve(&self, program: &str, name: &str, line: usize) -> Result<&str, ShaderError> {
        let source = self
            .includes
            .get(name)
            .ok_or_else(|| ShaderError::UnknownInclude {
                program: program.to_string(),
                name: name.to_string(),
                line,
            })?;

        let nested = source
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .find(|word| [VERT, FRAG, INCLUDE].contains(word));
        if let Some(directive) = nested {
            return Err(ShaderError::NestedDirective {
                name: name.to_string(),
                directive: directive.to_string(),
            });
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> ShaderLibrary {
        let mut library = ShaderLibrary::empty();
        library.register("common", "const K: f32 = 1.0;");
        library.register("bad", "#include common\nconst J: f32 = 2.0;");
        library
    }

    #[test]
    fn test_prelude_goes_to_both_stages() {
        let stages = library()
            .preprocess("t", "struct S { a: f32, }\n#vert\nfn v() {}\n#frag\nfn f() {}\n")
            .expect("valid source");
        assert!(stages.vertex.starts_with("struct S"));
        assert!(stages.fragment.starts_with("struct S"));
        assert!(stages.vertex.contains("fn v()"));
        assert!(!stages.vertex.contains("fn f()"));
        assert!(stages.fragment.contains("fn f()"));
        assert!(!stages.fragment.contains("fn v()"));
        assert!(!stages.vertex.contains('#'));
    }

    #[test]
    fn test_include_is_substituted_in_place() {
        let stages = library()
            .preprocess("t", "#vert\n#include <common>\nfn v() {}\n#frag\nfn f() {}\n")
            .expect("valid source");
        assert!(stages.vertex.contains("const K: f32 = 1.0;\nfn v()"));
        assert!(!stages.fragment.contains("const K"));
    }

    #[test]
    fn test_stage_order_does_not_matter() {
        let stages = library()
            .preprocess("t", "#frag\nfn f() {}\n#vert\nfn v() {}\n")
            .expect("valid source");
        assert!(stages.vertex.contains("fn v()"));
        assert!(stages.fragment.contains("fn f()"));
    }

    #[test]
    fn test_unknown_include() {
        let err = library()
            .preprocess("t", "#include nope\n#vert\n#frag\n")
            .unwrap_err();
        assert_eq!(
            err,
            ShaderError::UnknownInclude {
                program: "t".into(),
                name: "nope".into(),
                line: 1
            }
        );
    }

    #[test]
    fn test_nested_include_is_rejected() {
        let err = library()
            .preprocess("t", "#include bad\n#vert\n#frag\n")
            .unwrap_err();
        assert!(matches!(err, ShaderError::NestedDirective { .. }));
    }

    #[test]
    fn test_missing_and_duplicate_stages() {
        let missing = library().preprocess("t", "#vert\nfn v() {}\n").unwrap_err();
        assert_eq!(
            missing,
            ShaderError::MissingStage {
                program: "t".into(),
                marker: FRAG
            }
        );

        let duplicate = library()
            .preprocess("t", "#vert\n#frag\n#vert\n")
            .unwrap_err();
        assert_eq!(
            duplicate,
            ShaderError::DuplicateStage {
                program: "t".into(),
                marker: VERT,
                line: 3
            }
        );
    }

    fn validate(label: &str, stage: &str, source: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|err| panic!("{label} {stage} failed to parse: {}", err.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|err| panic!("{label} {stage} failed validation: {err:?}"));
    }

    #[test]
    fn test_overlay_vertex_stage_reads_highlight_inputs() {
        let stages = ShaderLibrary::default()
            .program(Program::Overlay)
            .expect("overlay preprocesses");
        for name in [
            "i_board",
            "i_capture",
            "highlight.hovered",
            "highlight.prev_move",
            "const CAPTURE_COLOR",
            "const LAST_MOVE_COLOR",
            "const REGULAR_COLOR",
            "const HEIGHT",
        ] {
            assert!(stages.vertex.contains(name), "vertex stage is missing `{name}`");
        }
    }

    #[test]
    fn test_shipped_programs_validate() {
        let library = ShaderLibrary::default();
        for program in Program::ALL {
            let stages = library.program(program).expect("program preprocesses");
            assert!(stages.vertex.contains("fn vs_main"));
            assert!(!stages.vertex.contains("fn fs_main"));
            assert!(stages.fragment.contains("fn fs_main"));
            assert!(!stages.fragment.contains("fn vs_main"));
            validate(program.label(), "vertex", &stages.vertex);
            validate(program.label(), "fragment", &stages.fragment);
        }
    }
}
