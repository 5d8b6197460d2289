//! Recursive-descent builder that turns a token stream into the mini-AST.
//! Never aborts: anything it cannot make sense of as a statement becomes an
//! `Unknown(raw_line)` node, and the caller always gets a `Vec<Node>` back.

use std::sync::Arc;

use railguard_core::model::ast::{KeywordArg, Node, NodeKind};
use railguard_core::model::diagnostic::Diagnostic;

use super::lexer::{tokenize, LTok, Tok};

pub struct AstBuilder {
    toks: Vec<LTok>,
    pos: usize,
    file: Arc<str>,
    source_lines: Vec<String>,
}

/// Parse `source` (the contents of `file`) into its top-level node list plus
/// any diagnostics the parse itself produced (currently just the
/// zero-constructs warning; per-`Unknown` diagnostics are the caller's job,
/// since only the consumer — Route Evaluator or Controller Analyzer — knows
/// whether a given `Unknown` mattered).
pub fn parse(source: &str, file: Arc<str>) -> (Vec<Node>, Vec<Diagnostic>) {
    let toks = tokenize(source);
    let mut builder = AstBuilder {
        toks,
        pos: 0,
        file: file.clone(),
        source_lines: source.lines().map(|s| s.to_string()).collect(),
    };
    let body = builder.parse_program();
    let mut diagnostics = Vec::new();
    if body.is_empty() {
        diagnostics.push(
            Diagnostic::warn("file produced zero recognizable top-level constructs")
                .at(file.to_string(), 1),
        );
    }
    (body, diagnostics)
}

impl AstBuilder {
    fn peek(&self) -> &Tok {
        &self.toks[self.pos.min(self.toks.len() - 1)].tok
    }

    fn peek_at(&self, offset: usize) -> &Tok {
        let idx = (self.pos + offset).min(self.toks.len() - 1);
        &self.toks[idx].tok
    }

    fn cur_line(&self) -> u32 {
        self.toks[self.pos.min(self.toks.len() - 1)].line
    }

    fn advance(&mut self) -> Tok {
        let t = self.toks[self.pos.min(self.toks.len() - 1)].tok.clone();
        if self.pos < self.toks.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == tok {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Tok) {
        if self.peek() == tok {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Tok::Newline) {
            self.advance();
        }
    }

    fn raw_line_text(&self, line: u32) -> String {
        self.source_lines
            .get((line.saturating_sub(1)) as usize)
            .cloned()
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn node(&self, kind: NodeKind, line: u32) -> Node {
        Node::new(kind, self.file.clone(), line)
    }

    pub fn parse_program(&mut self) -> Vec<Node> {
        self.parse_body_until()
    }

    /// Parse statements until one that cannot start a statement at all:
    /// `end`, `elsif`, `else`, or end-of-file. The caller inspects
    /// `self.peek()` afterward to see which terminator stopped it.
    fn parse_body_until(&mut self) -> Vec<Node> {
        let mut body = Vec::new();
        while let Some(n) = self.parse_statement() {
            body.push(n);
        }
        body
    }

    fn parse_statement(&mut self) -> Option<Node> {
        self.skip_newlines();
        match self.peek() {
            Tok::Eof | Tok::KwEnd | Tok::KwElsif | Tok::KwElse => None,
            Tok::KwClass => Some(self.parse_class_def()),
            Tok::KwModule => Some(self.parse_module_def()),
            Tok::KwDef => Some(self.parse_method_def()),
            Tok::KwIf => Some(self.parse_if()),
            Tok::Ident(_) if self.peek_at(1) == &Tok::Assign => Some(self.parse_assign()),
            Tok::Ident(_) | Tok::Const(_) => Some(self.parse_call_statement()),
            Tok::Symbol(_) | Tok::Str(_) | Tok::Int(_) | Tok::KwTrue | Tok::KwFalse
            | Tok::KwNil | Tok::LBracket | Tok::LBrace => {
                let v = self.parse_value();
                self.skip_to_statement_end();
                Some(v)
            }
            _ => Some(self.recover_unknown_statement()),
        }
    }

    fn recover_unknown_statement(&mut self) -> Node {
        let line = self.cur_line();
        self.skip_to_statement_end();
        self.node(NodeKind::Unknown(self.raw_line_text(line)), line)
    }

    fn skip_to_statement_end(&mut self) {
        while !matches!(
            self.peek(),
            Tok::Newline | Tok::Eof | Tok::KwEnd | Tok::KwElsif | Tok::KwElse
        ) {
            self.advance();
        }
        self.eat(&Tok::Newline);
    }

    fn parse_class_def(&mut self) -> Node {
        let line = self.cur_line();
        self.advance(); // class
        let name = self.parse_qualified_const();
        let parent = if self.eat(&Tok::Lt) {
            Some(self.parse_qualified_const())
        } else {
            None
        };
        self.skip_newlines();
        let body = self.parse_body_until();
        self.expect(&Tok::KwEnd);
        self.node(NodeKind::ClassDef { name, parent, body }, line)
    }

    fn parse_module_def(&mut self) -> Node {
        let line = self.cur_line();
        self.advance(); // module
        let name = self.parse_qualified_const();
        self.skip_newlines();
        let body = self.parse_body_until();
        self.expect(&Tok::KwEnd);
        self.node(NodeKind::ModuleDef { name, body }, line)
    }

    fn parse_method_def(&mut self) -> Node {
        let line = self.cur_line();
        self.advance(); // def
        if matches!(self.peek(), Tok::Ident(n) if n == "self") && self.peek_at(1) == &Tok::Dot {
            self.advance();
            self.advance();
        }
        let name = match self.peek().clone() {
            Tok::Ident(n) => {
                self.advance();
                n
            }
            Tok::Const(n) => {
                self.advance();
                n
            }
            _ => String::new(),
        };
        if self.eat(&Tok::LParen) {
            let mut depth = 1i32;
            while depth > 0 && !matches!(self.peek(), Tok::Eof) {
                match self.advance() {
                    Tok::LParen => depth += 1,
                    Tok::RParen => depth -= 1,
                    _ => {}
                }
            }
        }
        self.skip_newlines();
        let body = self.parse_body_until();
        self.expect(&Tok::KwEnd);
        self.node(NodeKind::MethodDef { name, body }, line)
    }

    fn parse_assign(&mut self) -> Node {
        let line = self.cur_line();
        let target = match self.advance() {
            Tok::Ident(n) => n,
            _ => String::new(),
        };
        self.advance(); // =
        let value = self.parse_value();
        self.skip_to_statement_end();
        self.node(
            NodeKind::Assign {
                target,
                value: Box::new(value),
            },
            line,
        )
    }

    fn parse_if(&mut self) -> Node {
        self.advance(); // if
        self.parse_if_or_elsif()
    }

    fn parse_if_or_elsif(&mut self) -> Node {
        let line = self.cur_line();
        let cond = self.parse_value();
        self.skip_to_statement_end_keep_terminators();
        let then_branch = self.parse_body_until();
        let else_branch = match self.peek().clone() {
            Tok::KwElsif => {
                self.advance();
                Some(vec![self.parse_if_or_elsif()])
            }
            Tok::KwElse => {
                self.advance();
                self.skip_newlines();
                let b = self.parse_body_until();
                self.expect(&Tok::KwEnd);
                Some(b)
            }
            Tok::KwEnd => {
                self.advance();
                None
            }
            _ => None,
        };
        self.node(
            NodeKind::IfExpr {
                cond: Box::new(cond),
                then_branch,
                else_branch,
            },
            line,
        )
    }

    /// After parsing an `if`/`elsif` condition, consume up to (but not past)
    /// the body — either a trailing newline or nothing (`if x then`-style is
    /// not supported and falls through tolerantly).
    fn skip_to_statement_end_keep_terminators(&mut self) {
        while !matches!(
            self.peek(),
            Tok::Newline | Tok::Eof | Tok::KwEnd | Tok::KwElsif | Tok::KwElse
        ) {
            self.advance();
        }
        self.skip_newlines();
    }

    fn parse_qualified_const(&mut self) -> String {
        let mut name = match self.peek().clone() {
            Tok::Const(n) => {
                self.advance();
                n
            }
            Tok::Ident(n) => {
                self.advance();
                n
            }
            _ => String::new(),
        };
        while self.peek() == &Tok::ColonColon {
            self.advance();
            if let Tok::Const(n) = self.peek().clone() {
                self.advance();
                name.push_str("::");
                name.push_str(&n);
            } else {
                break;
            }
        }
        name
    }

    fn parse_call_statement(&mut self) -> Node {
        let line = self.cur_line();
        if matches!(self.peek(), Tok::Const(_)) {
            let name = self.parse_qualified_const();
            let base = self.node(NodeKind::Ident(name), line);
            let chained = if self.peek() == &Tok::Dot {
                self.parse_dotted_calls(base)
            } else {
                base
            };
            self.skip_to_statement_end();
            return chained;
        }
        let name = match self.advance() {
            Tok::Ident(n) => n,
            _ => String::new(),
        };
        if self.peek() == &Tok::Dot {
            let base = self.node(NodeKind::Ident(name), line);
            let chained = self.parse_dotted_calls(base);
            self.skip_to_statement_end();
            return chained;
        }
        let (positional_args, keyword_args) = self.parse_call_args();
        let block = self.parse_optional_block();
        let call = self.node(
            NodeKind::Call {
                receiver: None,
                method: name,
                positional_args,
                keyword_args,
                block: block.map(Box::new),
            },
            line,
        );
        self.skip_to_statement_end();
        call
    }

    fn parse_dotted_calls(&mut self, base: Node) -> Node {
        let mut cur = base;
        while self.eat(&Tok::Dot) {
            let line = self.cur_line();
            let name = match self.peek().clone() {
                Tok::Ident(n) => {
                    self.advance();
                    n
                }
                Tok::Const(n) => {
                    self.advance();
                    n
                }
                _ => break,
            };
            let (positional_args, keyword_args) = if self.eat(&Tok::LParen) {
                let args = self.parse_args_list(true);
                self.expect(&Tok::RParen);
                args
            } else {
                (Vec::new(), Vec::new())
            };
            cur = self.node(
                NodeKind::Call {
                    receiver: Some(Box::new(cur)),
                    method: name,
                    positional_args,
                    keyword_args,
                    block: None,
                },
                line,
            );
        }
        if let Some(block) = self.parse_optional_block() {
            if let NodeKind::Call { block: slot, .. } = &mut cur.kind {
                *slot = Some(Box::new(block));
            }
        }
        cur
    }

    fn parse_call_args(&mut self) -> (Vec<Node>, Vec<KeywordArg>) {
        if self.eat(&Tok::LParen) {
            let args = self.parse_args_list(true);
            self.expect(&Tok::RParen);
            args
        } else if self.looks_like_bare_arg_start() {
            self.parse_args_list(false)
        } else {
            (Vec::new(), Vec::new())
        }
    }

    fn looks_like_bare_arg_start(&self) -> bool {
        match self.peek() {
            Tok::Symbol(_) | Tok::Str(_) | Tok::Int(_) | Tok::Const(_) | Tok::LBracket
            | Tok::LBrace | Tok::KwTrue | Tok::KwFalse | Tok::KwNil => true,
            Tok::Ident(_) => self.peek_at(1) == &Tok::Colon,
            _ => false,
        }
    }

    fn at_arg_list_end(&self, in_parens: bool) -> bool {
        match self.peek() {
            Tok::Eof => true,
            Tok::RParen => in_parens,
            Tok::RBrace | Tok::RBracket => true,
            Tok::Newline | Tok::KwDo | Tok::KwEnd | Tok::KwElsif | Tok::KwElse => !in_parens,
            _ => false,
        }
    }

    fn parse_args_list(&mut self, in_parens: bool) -> (Vec<Node>, Vec<KeywordArg>) {
        let mut positional = Vec::new();
        let mut keyword = Vec::new();
        loop {
            if in_parens {
                self.skip_newlines();
            }
            if self.at_arg_list_end(in_parens) {
                break;
            }
            if let Tok::Ident(name) = self.peek().clone() {
                if self.peek_at(1) == &Tok::Colon {
                    self.advance();
                    self.advance();
                    let value = self.parse_value();
                    keyword.push(KeywordArg { name, value });
                    if in_parens {
                        self.skip_newlines();
                    }
                    if self.eat(&Tok::Comma) {
                        continue;
                    }
                    break;
                }
            }
            let value = self.parse_value();
            if self.eat(&Tok::HashRocket) {
                let line = self.cur_line();
                let v2 = self.parse_value();
                positional.push(self.node(NodeKind::HashLit(vec![(value, v2)]), line));
            } else {
                positional.push(value);
            }
            if in_parens {
                self.skip_newlines();
            }
            if self.eat(&Tok::Comma) {
                continue;
            }
            break;
        }
        (positional, keyword)
    }

    fn parse_value(&mut self) -> Node {
        let line = self.cur_line();
        match self.peek().clone() {
            Tok::Symbol(s) => {
                self.advance();
                self.node(NodeKind::Symbol(s), line)
            }
            Tok::Str(s) => {
                self.advance();
                self.node(NodeKind::StringLit(s), line)
            }
            Tok::Int(n) => {
                self.advance();
                self.node(NodeKind::IntLit(n), line)
            }
            Tok::KwTrue => {
                self.advance();
                self.node(NodeKind::Ident("true".to_string()), line)
            }
            Tok::KwFalse => {
                self.advance();
                self.node(NodeKind::Ident("false".to_string()), line)
            }
            Tok::KwNil => {
                self.advance();
                self.node(NodeKind::Ident("nil".to_string()), line)
            }
            Tok::LBracket => self.parse_array_lit(),
            Tok::LBrace => self.parse_hash_lit(),
            Tok::Const(_) => {
                let name = self.parse_qualified_const();
                let base = self.node(NodeKind::Ident(name), line);
                if self.peek() == &Tok::Dot {
                    self.parse_dotted_calls(base)
                } else {
                    base
                }
            }
            Tok::Ident(n) => {
                self.advance();
                let base = self.node(NodeKind::Ident(n), line);
                if self.peek() == &Tok::Dot {
                    self.parse_dotted_calls(base)
                } else if self.eat(&Tok::LParen) {
                    let (positional_args, keyword_args) = self.parse_args_list(true);
                    self.expect(&Tok::RParen);
                    if let NodeKind::Ident(method) = base.kind {
                        self.node(
                            NodeKind::Call {
                                receiver: None,
                                method,
                                positional_args,
                                keyword_args,
                                block: None,
                            },
                            line,
                        )
                    } else {
                        base
                    }
                } else {
                    base
                }
            }
            _ => {
                self.advance();
                self.node(NodeKind::Unknown(self.raw_line_text(line)), line)
            }
        }
    }

    fn parse_array_lit(&mut self) -> Node {
        let line = self.cur_line();
        self.advance(); // [
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), Tok::RBracket | Tok::Eof) {
                break;
            }
            items.push(self.parse_value());
            self.skip_newlines();
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(&Tok::RBracket);
        self.node(NodeKind::ArrayLit(items), line)
    }

    fn parse_hash_lit(&mut self) -> Node {
        let line = self.cur_line();
        self.advance(); // {
        let mut pairs = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), Tok::RBrace | Tok::Eof) {
                break;
            }
            if let Tok::Ident(name) = self.peek().clone() {
                if self.peek_at(1) == &Tok::Colon {
                    self.advance();
                    self.advance();
                    let key = self.node(NodeKind::Symbol(name), line);
                    let value = self.parse_value();
                    pairs.push((key, value));
                    self.skip_newlines();
                    if !self.eat(&Tok::Comma) {
                        break;
                    }
                    continue;
                }
            }
            let key = self.parse_value();
            if self.eat(&Tok::HashRocket) {
                let value = self.parse_value();
                pairs.push((key, value));
            }
            self.skip_newlines();
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(&Tok::RBrace);
        self.node(NodeKind::HashLit(pairs), line)
    }

    fn parse_optional_block(&mut self) -> Option<Node> {
        let line = self.cur_line();
        if self.eat(&Tok::KwDo) {
            let params = self.parse_block_params();
            self.skip_newlines();
            let body = self.parse_body_until();
            self.expect(&Tok::KwEnd);
            Some(self.node(NodeKind::Block { params, body }, line))
        } else if self.peek() == &Tok::LBrace {
            self.advance();
            let params = self.parse_block_params();
            self.skip_newlines();
            let body = self.parse_body_until_brace();
            self.expect(&Tok::RBrace);
            Some(self.node(NodeKind::Block { params, body }, line))
        } else {
            None
        }
    }

    /// Like `parse_body_until`, but also stops at a bare `}` (brace-form
    /// blocks don't use `end`/`elsif`/`else`).
    fn parse_body_until_brace(&mut self) -> Vec<Node> {
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), Tok::RBrace | Tok::Eof) {
                break;
            }
            match self.parse_statement() {
                Some(n) => body.push(n),
                None => break,
            }
        }
        body
    }

    fn parse_block_params(&mut self) -> Vec<String> {
        if !self.eat(&Tok::Pipe) {
            return Vec::new();
        }
        let mut params = Vec::new();
        loop {
            if let Tok::Ident(n) = self.peek().clone() {
                self.advance();
                params.push(n);
            } else {
                break;
            }
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(&Tok::Pipe);
        params
    }
}

pub fn parse_file(source: &str, file: &str) -> (Vec<Node>, Vec<Diagnostic>) {
    parse(source, Arc::from(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_src(src: &str) -> Vec<Node> {
        parse(src, Arc::from("config/routes.rb")).0
    }

    #[test]
    fn parses_bare_symbol_call() {
        let nodes = parse_src("resources :posts\n");
        assert_eq!(nodes.len(), 1);
        match &nodes[0].kind {
            NodeKind::Call {
                method,
                positional_args,
                ..
            } => {
                assert_eq!(method, "resources");
                assert_eq!(positional_args.len(), 1);
                assert!(matches!(&positional_args[0].kind, NodeKind::Symbol(s) if s == "posts"));
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn parses_keyword_args_and_block() {
        let nodes = parse_src("namespace :api do\n  resources :users, only: [:index, :show]\nend\n");
        assert_eq!(nodes.len(), 1);
        let NodeKind::Call { method, positional_args, block, .. } = &nodes[0].kind else {
            panic!("expected Call");
        };
        assert_eq!(method, "namespace");
        assert!(matches!(&positional_args[0].kind, NodeKind::Symbol(s) if s == "api"));
        let block = block.as_ref().expect("block");
        let NodeKind::Block { body, .. } = &block.kind else {
            panic!("expected Block");
        };
        assert_eq!(body.len(), 1);
        let NodeKind::Call { keyword_args, .. } = &body[0].kind else {
            panic!("expected nested Call");
        };
        assert_eq!(keyword_args[0].name, "only");
    }

    #[test]
    fn parses_class_def_with_parent() {
        let nodes = parse_src("class PostsController < ApplicationController\nend\n");
        match &nodes[0].kind {
            NodeKind::ClassDef { name, parent, .. } => {
                assert_eq!(name, "PostsController");
                assert_eq!(parent.as_deref(), Some("ApplicationController"));
            }
            other => panic!("expected ClassDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_module_and_class() {
        let src = "module Api\n  module V1\n    class UsersController < ApplicationController\n      before_action :authenticate_user!\n    end\n  end\nend\n";
        let nodes = parse_src(src);
        let NodeKind::ModuleDef { name, body, .. } = &nodes[0].kind else {
            panic!("expected ModuleDef")
        };
        assert_eq!(name, "Api");
        let NodeKind::ModuleDef { body: inner, .. } = &body[0].kind else {
            panic!("expected nested ModuleDef")
        };
        let NodeKind::ClassDef { body: cls_body, .. } = &inner[0].kind else {
            panic!("expected ClassDef")
        };
        assert_eq!(cls_body.len(), 1);
    }

    #[test]
    fn unparseable_statement_becomes_unknown() {
        let nodes = parse_src("&:noop\n");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0].kind, NodeKind::Unknown(_)));
    }

    #[test]
    fn empty_file_has_zero_nodes_and_a_warning() {
        let (nodes, diags) = parse("# just a comment\n", Arc::from("config/routes.rb"));
        assert!(nodes.is_empty());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn hash_rocket_mount_target_becomes_hashlit() {
        let nodes = parse_src("mount Sidekiq::Web => '/sidekiq'\n");
        let NodeKind::Call { positional_args, .. } = &nodes[0].kind else {
            panic!("expected Call")
        };
        assert!(matches!(&positional_args[0].kind, NodeKind::HashLit(pairs) if pairs.len() == 1));
    }

    #[test]
    fn if_else_both_branches_parsed() {
        let src = "if Rails.env.development?\n  get '/debug', to: 'debug#index'\nelse\n  get '/prod', to: 'prod#index'\nend\n";
        let nodes = parse_src(src);
        let NodeKind::IfExpr { then_branch, else_branch, .. } = &nodes[0].kind else {
            panic!("expected IfExpr")
        };
        assert_eq!(then_branch.len(), 1);
        assert_eq!(else_branch.as_ref().map(|b| b.len()), Some(1));
    }

    #[test]
    fn strong_params_chain_parses() {
        let src = "def post_params\n  params.require(:post).permit(:title, :body)\nend\n";
        let nodes = parse_src(src);
        let NodeKind::MethodDef { name, body } = &nodes[0].kind else {
            panic!("expected MethodDef")
        };
        assert_eq!(name, "post_params");
        let NodeKind::Call { method, receiver, .. } = &body[0].kind else {
            panic!("expected Call")
        };
        assert_eq!(method, "permit");
        assert!(receiver.is_some());
    }
}
