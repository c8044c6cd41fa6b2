use anyhow::{Result, anyhow};
use std::sync::Arc;
use swc_common::{BytePos, FileName, Globals, SourceMap, Span};
use swc_ecma_ast::Program;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

/// A parsed JavaScript file, keeping the original text around so spans can be
/// sliced back out of it for text edits.
pub struct ParsedJs {
    pub program: Program,
    pub source_map: Arc<SourceMap>,
    pub source: String,
    /// Offset of the file inside the source map; spans are relative to it.
    pub start_pos: BytePos,
}

impl ParsedJs {
    /// Source text covered by a span.
    pub fn span_text(&self, span: Span) -> &str {
        &self.source[self.offset(span.lo)..self.offset(span.hi)]
    }

    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// 1-based line number of a position.
    pub fn line_of(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }

    /// Full text of the line containing a position.
    pub fn line_text(&self, pos: BytePos) -> String {
        let loc = self.source_map.lookup_char_pos(pos);
        loc.file
            .get_line(loc.line - 1)
            .map(|l| l.into_owned())
            .unwrap_or_default()
    }
}

/// Parse a JavaScript source string into an AST.
///
/// Plain ES syntax only; the legacy string-bundle callers being migrated are
/// privileged browser scripts, never TypeScript or JSX.
pub fn parse_js_source(code: String, file_path: &str) -> Result<ParsedJs> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Arc::default();

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.clone());

        let syntax = Syntax::Es(EsSyntax::default());
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let program = parser
            .parse_program()
            .map_err(|e| anyhow!("Failed to parse {file_path}: {:?}", e))?;

        Ok(ParsedJs {
            program,
            source_map: source_map.clone(),
            source: code,
            start_pos: source_file.start_pos,
        })
    })
}
