//! Best-effort sketch parser for Java-shaped source.
//!
//! The parser recovers imports, type declarations, and member declarations
//! with just enough fidelity for signature analysis: annotations, modifiers,
//! generic type references, parameter lists, and throws clauses. It favors
//! recall over precision; members it cannot parse are skipped, and it never
//! fails on malformed input.

use crate::ast::{
    FieldDeclSyntax, ImportDecl, MethodDeclSyntax, ParamSyntax, SourceFile, TypeDeclKind,
    TypeDeclSyntax, TypeSyntax,
};
use crate::text::TextRange;

pub fn parse(text: &str) -> SourceFile {
    Parser::new(text).parse_file()
}

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "default",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
];

fn is_modifier(word: &str) -> bool {
    MODIFIERS.contains(&word)
}

fn is_ident_start(b: u8) -> bool {
    (b as char).is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || (b as char).is_ascii_digit()
}

pub(crate) fn simple_type_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            cursor: 0,
        }
    }

    fn parse_file(mut self) -> SourceFile {
        let mut imports = Vec::new();
        let mut types = Vec::new();
        while let Some((token, token_range)) = self.scan_identifier() {
            match token.as_str() {
                "import" => {
                    if let Some(import) = self.parse_import() {
                        imports.push(import);
                    }
                }
                "class" | "interface" | "enum" | "record" => {
                    if let Some(decl) = self.parse_type_decl(&token, token_range) {
                        types.push(decl);
                    }
                }
                _ => {}
            }
        }
        SourceFile { imports, types }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    fn parse_import(&mut self) -> Option<ImportDecl> {
        let mut is_static = false;
        let (mut first, _) = self.next_identifier()?;
        if first == "static" {
            is_static = true;
            let (next, _) = self.next_identifier()?;
            first = next;
        }
        let mut path = first;
        loop {
            self.skip_ws_and_comments();
            if self.peek() != Some(b'.') {
                break;
            }
            self.cursor += 1;
            self.skip_ws_and_comments();
            if self.peek() == Some(b'*') {
                self.cursor += 1;
                path.push_str(".*");
                break;
            }
            match self.next_identifier() {
                Some((segment, _)) => {
                    path.push('.');
                    path.push_str(&segment);
                }
                None => break,
            }
        }
        if let Some(pos) = self.find_next_code_byte(b';') {
            self.cursor = pos + 1;
        }
        Some(ImportDecl { path, is_static })
    }

    fn parse_type_decl(&mut self, keyword: &str, kw_range: TextRange) -> Option<TypeDeclSyntax> {
        let kind = match keyword {
            "interface" => TypeDeclKind::Interface,
            "enum" => TypeDeclKind::Enum,
            "record" => TypeDeclKind::Record,
            _ => TypeDeclKind::Class,
        };
        let (name, name_range) = self.next_identifier()?;
        self.skip_ws_and_comments();
        if self.peek() == Some(b'<') {
            self.skip_angle_brackets();
        }
        if kind == TypeDeclKind::Record {
            self.skip_ws_and_comments();
            if self.peek() == Some(b'(') {
                if let Some(close) = find_matching_paren(self.text, self.cursor) {
                    self.cursor = close;
                }
            }
        }

        let mut extends = None;
        let mut implements = Vec::new();
        let mut extends_interfaces = Vec::new();
        if kind == TypeDeclKind::Interface {
            if self.eat_keyword("extends") {
                extends_interfaces = self.parse_type_name_list();
            }
        } else {
            if self.eat_keyword("extends") {
                extends = self
                    .next_type_name()
                    .map(|n| simple_type_name(&n).to_string());
            }
            if self.eat_keyword("implements") {
                implements = self.parse_type_name_list();
            }
        }

        let body_start = self.find_next_code_byte(b'{')?;
        let body_end = find_matching_brace(self.text, body_start)?;
        let decl_range = TextRange::new(kw_range.start, body_end);
        let body_text = &self.text[body_start + 1..body_end - 1];
        let (methods, fields) = parse_members(body_text, body_start + 1);
        self.cursor = body_end;

        Some(TypeDeclSyntax {
            kind,
            name,
            extends,
            implements,
            extends_interfaces,
            methods,
            fields,
            name_range,
            decl_range,
        })
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws_and_comments();
        let saved = self.cursor;
        match self.next_identifier() {
            Some((word, _)) if word == keyword => true,
            _ => {
                self.cursor = saved;
                false
            }
        }
    }

    fn parse_type_name_list(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            self.skip_ws_and_comments();
            // Skip type annotations like `@Nullable`.
            while self.peek() == Some(b'@') {
                self.cursor += 1;
                let _ = self.next_identifier();
                self.skip_ws_and_comments();
            }
            let Some(name) = self.next_type_name() else {
                break;
            };
            out.push(simple_type_name(&name).to_string());
            self.skip_ws_and_comments();
            if self.peek() == Some(b',') {
                self.cursor += 1;
                continue;
            }
            break;
        }
        out
    }

    fn next_type_name(&mut self) -> Option<String> {
        let (first, _) = self.next_identifier()?;
        let mut name = first;
        loop {
            self.skip_ws_and_comments();
            if self.peek() != Some(b'.') {
                break;
            }
            self.cursor += 1;
            self.skip_ws_and_comments();
            let Some((segment, _)) = self.next_identifier() else {
                break;
            };
            name.push('.');
            name.push_str(&segment);
        }
        self.skip_ws_and_comments();
        if self.peek() == Some(b'<') {
            self.skip_angle_brackets();
        }
        loop {
            self.skip_ws_and_comments();
            if self.peek() == Some(b'[') {
                self.cursor += 1;
                self.skip_ws_and_comments();
                if self.peek() == Some(b']') {
                    self.cursor += 1;
                    continue;
                }
            }
            break;
        }
        Some(name)
    }

    fn skip_angle_brackets(&mut self) {
        if self.peek() != Some(b'<') {
            return;
        }
        let mut depth: i32 = 0;
        while self.cursor < self.bytes.len() {
            match self.bytes[self.cursor] {
                b'<' => depth += 1,
                b'>' => {
                    depth -= 1;
                    if depth <= 0 {
                        self.cursor += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.cursor += 1;
        }
    }

    fn next_identifier(&mut self) -> Option<(String, TextRange)> {
        self.skip_ws_and_comments();
        let start = self.cursor;
        if start >= self.bytes.len() || !is_ident_start(self.bytes[start]) {
            return None;
        }
        let mut end = start + 1;
        while end < self.bytes.len() && is_ident_continue(self.bytes[end]) {
            end += 1;
        }
        self.cursor = end;
        Some((self.text[start..end].to_string(), TextRange::new(start, end)))
    }

    fn scan_identifier(&mut self) -> Option<(String, TextRange)> {
        while self.cursor < self.bytes.len() {
            self.skip_ws_and_comments();
            if self.cursor >= self.bytes.len() {
                return None;
            }
            match self.bytes[self.cursor] {
                b'"' => {
                    self.cursor = skip_string(self.bytes, self.cursor);
                    continue;
                }
                b'\'' => {
                    self.cursor = skip_char_literal(self.bytes, self.cursor);
                    continue;
                }
                _ => {}
            }
            if is_ident_start(self.bytes[self.cursor]) {
                return self.next_identifier();
            }
            self.cursor += 1;
        }
        None
    }

    fn skip_ws_and_comments(&mut self) {
        while self.cursor < self.bytes.len() {
            let b = self.bytes[self.cursor];
            if b.is_ascii_whitespace() {
                self.cursor += 1;
                continue;
            }
            if b == b'/' && self.cursor + 1 < self.bytes.len() {
                if self.bytes[self.cursor + 1] == b'/' {
                    self.cursor += 2;
                    while self.cursor < self.bytes.len() && self.bytes[self.cursor] != b'\n' {
                        self.cursor += 1;
                    }
                    continue;
                }
                if self.bytes[self.cursor + 1] == b'*' {
                    self.cursor += 2;
                    while self.cursor + 1 < self.bytes.len() {
                        if self.bytes[self.cursor] == b'*' && self.bytes[self.cursor + 1] == b'/' {
                            self.cursor += 2;
                            break;
                        }
                        self.cursor += 1;
                    }
                    continue;
                }
            }
            break;
        }
    }

    fn find_next_code_byte(&self, needle: u8) -> Option<usize> {
        let bytes = self.bytes;
        let mut i = self.cursor;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    i = skip_string(bytes, i);
                    continue;
                }
                b'\'' => {
                    i = skip_char_literal(bytes, i);
                    continue;
                }
                b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                    i += 2;
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                    i += 2;
                    while i + 1 < bytes.len() {
                        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                    continue;
                }
                _ => {}
            }
            if bytes[i] == needle {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}

struct MemberSite {
    member_start: usize,
    name_start: usize,
    name_end: usize,
    open_paren: usize,
    /// Index just past the closing `)`.
    close_paren: usize,
    /// Index of the `{` or `;` terminator.
    terminator: usize,
    /// Index just past the body's closing `}` or the `;`.
    decl_end: usize,
    has_body: bool,
    throws: Vec<String>,
}

/// Scans a type body (brace depth 0 relative to the body) for member
/// declarations.
fn parse_members(body: &str, offset: usize) -> (Vec<MethodDeclSyntax>, Vec<FieldDeclSyntax>) {
    let bytes = body.as_bytes();
    let mut methods = Vec::new();
    let mut fields = Vec::new();
    let mut i = 0usize;
    let mut member_start = 0usize;
    let mut paren_depth = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'\'' => {
                i = skip_char_literal(bytes, i);
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                i += 2;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < bytes.len() {
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                continue;
            }
            _ => {}
        }

        if paren_depth > 0 {
            match bytes[i] {
                b'(' => paren_depth += 1,
                b')' => paren_depth -= 1,
                _ => {}
            }
            i += 1;
            continue;
        }

        match bytes[i] {
            b'(' => {
                paren_depth += 1;
                i += 1;
                continue;
            }
            b'{' => {
                // Either a block member (initializer block, nested type) or a
                // brace inside a field initializer.
                let initializer = has_top_level_assignment(&body[member_start..i]);
                i = find_matching_brace(body, i).unwrap_or(bytes.len());
                if !initializer {
                    member_start = i;
                }
                continue;
            }
            b';' => {
                let statement = &body[member_start..i];
                fields.extend(parse_field_statement(
                    statement,
                    offset + member_start,
                    offset + i + 1,
                ));
                i += 1;
                member_start = i;
                continue;
            }
            _ => {}
        }

        if is_ident_start(bytes[i]) {
            let name_start = i;
            i += 1;
            while i < bytes.len() && is_ident_continue(bytes[i]) {
                i += 1;
            }
            let name_end = i;

            let mut j = i;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < bytes.len()
                && bytes[j] == b'('
                && !has_top_level_assignment(&body[member_start..name_start])
            {
                if let Some(close) = find_matching_paren(body, j) {
                    let mut k = close;
                    while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                        k += 1;
                    }
                    let mut throws = Vec::new();
                    if body[k..].starts_with("throws")
                        && !bytes
                            .get(k + "throws".len())
                            .copied()
                            .is_some_and(is_ident_continue)
                    {
                        k += "throws".len();
                        let throws_start = k;
                        while k < bytes.len() && bytes[k] != b'{' && bytes[k] != b';' {
                            k += 1;
                        }
                        throws = body[throws_start..k]
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                    }
                    if k < bytes.len() && (bytes[k] == b'{' || bytes[k] == b';') {
                        let has_body = bytes[k] == b'{';
                        let decl_end = if has_body {
                            find_matching_brace(body, k).unwrap_or(bytes.len())
                        } else {
                            k + 1
                        };
                        let site = MemberSite {
                            member_start,
                            name_start,
                            name_end,
                            open_paren: j,
                            close_paren: close,
                            terminator: k,
                            decl_end,
                            has_body,
                            throws,
                        };
                        // Constructors and unparseable headers are skipped but
                        // still consumed, so scanning resumes after their body.
                        if let Some(method) = build_method(body, offset, site) {
                            methods.push(method);
                        }
                        i = decl_end;
                        member_start = i;
                        continue;
                    }
                }
            }
            continue;
        }

        i += 1;
    }

    (methods, fields)
}

fn build_method(body: &str, offset: usize, site: MemberSite) -> Option<MethodDeclSyntax> {
    let header = &body[site.member_start..site.name_start];
    let mut cur = Cursor::new(header);
    let annotations = cur.parse_annotations();
    cur.skip_ws();
    let core_start = cur.pos;

    let mut modifiers = Vec::new();
    loop {
        cur.skip_ws();
        let saved = cur.pos;
        match cur.ident() {
            Some(word) if is_modifier(word) => modifiers.push(word.to_string()),
            _ => {
                cur.pos = saved;
                break;
            }
        }
    }
    cur.skip_ws();
    let type_params = if cur.peek() == Some(b'<') {
        let start = cur.pos;
        cur.skip_angle_brackets();
        Some(header[start..cur.pos].to_string())
    } else {
        None
    };

    // Return-type annotations (`public @Nullable String get()`) sit inside
    // the region the rebuilt header replaces; consume them.
    let _ = cur.parse_annotations();

    // Constructors have no return type and bail out here.
    let return_type = cur.parse_type()?;
    cur.skip_ws();
    if !cur.at_end() {
        return None;
    }

    let params = parse_param_list(&body[site.open_paren + 1..site.close_paren - 1])?;
    let name = body[site.name_start..site.name_end].to_string();

    // The declaration range starts at the beginning of the line carrying the
    // member's first token (annotations included), clamped to the member
    // boundary so same-line members don't overlap.
    let member_slice = &body[site.member_start..site.name_start];
    let first_token_rel = member_slice.find(|c: char| !c.is_whitespace()).unwrap_or(0);
    let token_start = site.member_start + first_token_rel;
    let line_start = body[..token_start].rfind('\n').map(|p| p + 1).unwrap_or(0);
    let decl_start = site.member_start.max(line_start);

    Some(MethodDeclSyntax {
        annotations,
        modifiers,
        type_params,
        return_type,
        name,
        params,
        throws: site.throws,
        has_body: site.has_body,
        name_range: TextRange::new(offset + site.name_start, offset + site.name_end),
        header_range: TextRange::new(
            offset + site.member_start + core_start,
            offset + site.terminator + 1,
        ),
        decl_range: TextRange::new(offset + decl_start, offset + site.decl_end),
    })
}

fn parse_param_list(src: &str) -> Option<Vec<ParamSyntax>> {
    let mut out = Vec::new();
    if src.trim().is_empty() {
        return Some(out);
    }
    for part in split_top_level(src, ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let mut cur = Cursor::new(part);
        let annotations = cur.parse_annotations();
        let mut modifiers = Vec::new();
        loop {
            cur.skip_ws();
            let saved = cur.pos;
            match cur.ident() {
                Some("final") => modifiers.push("final".to_string()),
                _ => {
                    cur.pos = saved;
                    break;
                }
            }
        }
        let mut ty = cur.parse_type()?;
        cur.skip_ws();
        if part[cur.pos..].starts_with("...") {
            cur.pos += 3;
            ty.dims += 1;
        }
        cur.skip_ws();
        let name = cur.ident()?.to_string();
        // C-style trailing dims: `int xs[]`.
        loop {
            cur.skip_ws();
            if cur.peek() == Some(b'[') {
                let saved = cur.pos;
                cur.bump();
                cur.skip_ws();
                if cur.peek() == Some(b']') {
                    cur.bump();
                    ty.dims += 1;
                    continue;
                }
                cur.pos = saved;
            }
            break;
        }
        cur.skip_ws();
        if !cur.at_end() {
            return None;
        }
        out.push(ParamSyntax {
            annotations,
            modifiers,
            ty,
            name,
        });
    }
    Some(out)
}

fn parse_field_statement(
    statement: &str,
    stmt_offset: usize,
    decl_end: usize,
) -> Vec<FieldDeclSyntax> {
    let mut cur = Cursor::new(statement);
    let _annotations = cur.parse_annotations();
    let mut modifiers = Vec::new();
    loop {
        cur.skip_ws();
        let saved = cur.pos;
        match cur.ident() {
            Some(word) if is_modifier(word) => modifiers.push(word.to_string()),
            _ => {
                cur.pos = saved;
                break;
            }
        }
    }
    let Some(ty) = cur.parse_type() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    loop {
        cur.skip_ws();
        let name_start = cur.pos;
        let Some(name) = cur.ident() else {
            break;
        };
        out.push(FieldDeclSyntax {
            modifiers: modifiers.clone(),
            ty: ty.clone(),
            name: name.to_string(),
            name_range: TextRange::new(stmt_offset + name_start, stmt_offset + cur.pos),
            decl_range: TextRange::new(stmt_offset, decl_end),
        });
        if !cur.skip_to_top_level_comma() {
            break;
        }
    }
    out
}

/// A small cursor over member-header text.
struct Cursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_ws(&mut self) {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos + 1 < self.bytes.len() && self.bytes[self.pos] == b'/' {
                if self.bytes[self.pos + 1] == b'/' {
                    self.pos += 2;
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                    continue;
                }
                if self.bytes[self.pos + 1] == b'*' {
                    self.pos += 2;
                    while self.pos + 1 < self.bytes.len() {
                        if self.bytes[self.pos] == b'*' && self.bytes[self.pos + 1] == b'/' {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                    continue;
                }
            }
            break;
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        if start >= self.bytes.len() || !is_ident_start(self.bytes[start]) {
            return None;
        }
        let mut end = start + 1;
        while end < self.bytes.len() && is_ident_continue(self.bytes[end]) {
            end += 1;
        }
        self.pos = end;
        Some(&self.text[start..end])
    }

    fn parse_annotations(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() != Some(b'@') {
                break;
            }
            self.bump();
            let Some(first) = self.ident() else {
                break;
            };
            let mut name = first.to_string();
            loop {
                self.skip_ws();
                if self.peek() != Some(b'.') {
                    break;
                }
                let saved = self.pos;
                self.bump();
                self.skip_ws();
                match self.ident() {
                    Some(segment) => {
                        name.push('.');
                        name.push_str(segment);
                    }
                    None => {
                        self.pos = saved;
                        break;
                    }
                }
            }
            self.skip_ws();
            if self.peek() == Some(b'(') {
                self.pos = find_matching_paren(self.text, self.pos).unwrap_or(self.bytes.len());
            }
            out.push(name);
        }
        out
    }

    fn parse_type(&mut self) -> Option<TypeSyntax> {
        self.skip_ws();
        if self.peek() == Some(b'?') {
            self.bump();
            // Bounded wildcards keep only the `?`; the bound is consumed.
            self.skip_ws();
            let saved = self.pos;
            match self.ident() {
                Some("extends") | Some("super") => {
                    self.parse_type()?;
                }
                _ => self.pos = saved,
            }
            return Some(TypeSyntax::new("?"));
        }

        let mut name = self.ident()?.to_string();
        loop {
            self.skip_ws();
            if self.peek() != Some(b'.') {
                break;
            }
            let saved = self.pos;
            self.bump();
            self.skip_ws();
            match self.ident() {
                Some(segment) => {
                    name.push('.');
                    name.push_str(segment);
                }
                None => {
                    self.pos = saved;
                    break;
                }
            }
        }

        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b'<') {
            self.bump();
            self.skip_ws();
            if self.peek() == Some(b'>') {
                // Diamond `<>`.
                self.bump();
            } else {
                loop {
                    let arg = self.parse_type()?;
                    args.push(arg);
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => self.bump(),
                        Some(b'>') => {
                            self.bump();
                            break;
                        }
                        _ => return None,
                    }
                }
            }
        }

        let mut dims = 0usize;
        loop {
            self.skip_ws();
            if self.peek() == Some(b'[') {
                let saved = self.pos;
                self.bump();
                self.skip_ws();
                if self.peek() == Some(b']') {
                    self.bump();
                    dims += 1;
                    continue;
                }
                self.pos = saved;
            }
            break;
        }

        Some(TypeSyntax { name, args, dims })
    }

    fn skip_angle_brackets(&mut self) {
        if self.peek() != Some(b'<') {
            return;
        }
        let mut depth: i32 = 0;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'<' => depth += 1,
                b'>' => {
                    depth -= 1;
                    if depth <= 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Advances past the next `,` outside any nesting; returns whether one was
    /// found.
    fn skip_to_top_level_comma(&mut self) -> bool {
        let mut paren = 0i32;
        let mut bracket = 0i32;
        let mut brace = 0i32;
        let mut angle = 0i32;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'"' => {
                    self.pos = skip_string(self.bytes, self.pos);
                    continue;
                }
                b'\'' => {
                    self.pos = skip_char_literal(self.bytes, self.pos);
                    continue;
                }
                b'(' => paren += 1,
                b')' => paren -= 1,
                b'[' => bracket += 1,
                b']' => bracket -= 1,
                b'{' => brace += 1,
                b'}' => brace -= 1,
                b'<' => angle += 1,
                b'>' => angle = (angle - 1).max(0),
                b',' if paren == 0 && bracket == 0 && brace == 0 && angle == 0 => {
                    self.pos += 1;
                    return true;
                }
                _ => {}
            }
            self.pos += 1;
        }
        false
    }
}

fn has_top_level_assignment(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'\'' => {
                i = skip_char_literal(bytes, i);
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                i += 2;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < bytes.len() {
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'=' if depth == 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { 0 };
                let next = bytes.get(i + 1).copied().unwrap_or(0);
                if prev != b'=' && prev != b'!' && prev != b'<' && prev != b'>' && next != b'=' {
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// Splits on `sep` outside strings, parens, brackets, braces, and angle
/// brackets (so generic arguments survive).
fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut paren = 0i32;
    let mut bracket = 0i32;
    let mut brace = 0i32;
    let mut angle = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0usize;
    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let ch = bytes[i] as char;
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' => paren += 1,
            ')' => paren -= 1,
            '[' => bracket += 1,
            ']' => bracket -= 1,
            '{' => brace += 1,
            '}' => brace -= 1,
            '<' => angle += 1,
            '>' => angle = (angle - 1).max(0),
            _ => {}
        }
        if ch == sep && paren == 0 && bracket == 0 && brace == 0 && angle == 0 {
            out.push(text[start..i].to_string());
            start = i + 1;
        }
        i += 1;
    }
    out.push(text[start..].to_string());
    out
}

/// Returns the index just past the matching `)`.
fn find_matching_paren(text: &str, open_paren: usize) -> Option<usize> {
    find_matching(text, open_paren, b'(', b')')
}

/// Returns the index just past the matching `}`.
fn find_matching_brace(text: &str, open_brace: usize) -> Option<usize> {
    find_matching(text, open_brace, b'{', b'}')
}

fn find_matching(text: &str, open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open_pos;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'\'' => {
                i = skip_char_literal(bytes, i);
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                i += 2;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < bytes.len() {
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                continue;
            }
            b => {
                if b == open {
                    depth += 1;
                } else if b == close {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
            }
        }
        i += 1;
    }
    None
}

/// Advances past a string literal, including text blocks (`""" ... """`).
fn skip_string(bytes: &[u8], mut i: usize) -> usize {
    debug_assert_eq!(bytes.get(i), Some(&b'"'));
    if i + 2 < bytes.len() && bytes[i + 1] == b'"' && bytes[i + 2] == b'"' {
        i += 3;
        while i + 2 < bytes.len() {
            if bytes[i] == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if bytes[i] == b'"' && bytes[i + 1] == b'"' && bytes[i + 2] == b'"' {
                return i + 3;
            }
            i += 1;
        }
        return bytes.len();
    }
    i += 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i = (i + 2).min(bytes.len());
            continue;
        }
        if bytes[i] == b'"' {
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_char_literal(bytes: &[u8], mut i: usize) -> usize {
    debug_assert_eq!(bytes.get(i), Some(&b'\''));
    i += 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i = (i + 2).min(bytes.len());
            continue;
        }
        if bytes[i] == b'\'' {
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}
