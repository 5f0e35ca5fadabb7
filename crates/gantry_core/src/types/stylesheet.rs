use crate::diagnostic::Diagnostic;
use crate::diagnostic::DiagnosticBuilder;
use crate::diagnostic::ErrorKind;

/// Conditional group rules whose block contains nested rules rather than
/// declarations.
const GROUP_RULES: [&str; 6] = [
  "container",
  "document",
  "layer",
  "media",
  "-moz-document",
  "supports",
];

/// A parsed stylesheet: an ordered sequence of rules and comments.
///
/// Constructed transiently per build invocation, transformed in place by
/// post-processor plugins, serialized with [`Stylesheet::to_css`] and then
/// discarded. Nothing about it persists across invocations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
  pub items: Vec<CssItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CssItem {
  Style(StyleRule),
  At(AtRule),
  /// A top-level comment, stored verbatim including its delimiters
  Comment(String),
}

/// A style rule. The declaration block is opaque: transforms may replace the
/// selector text but must never inspect or alter the body.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
  pub selector: String,
  pub body: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
  /// The rule name without the leading `@`
  pub name: String,
  pub prelude: String,
  pub block: AtRuleBlock,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AtRuleBlock {
  /// Statement at-rules such as `@import` and `@charset`
  None,
  /// Declaration-carrying at-rules such as `@font-face`, kept verbatim
  Opaque(String),
  /// Conditional group rules such as `@media`, containing nested rules
  Rules(Vec<CssItem>),
}

impl Stylesheet {
  /// Parses source text into a rule-level document.
  ///
  /// Declaration blocks are captured verbatim, so anything a browser would
  /// accept inside a block round-trips unchanged. Unbalanced blocks and
  /// unterminated comments or strings are reported as parse diagnostics.
  pub fn parse(code: &str) -> Result<Self, Diagnostic> {
    let mut scanner = Scanner::new(code);
    let items = parse_items(&mut scanner, false)?;

    Ok(Stylesheet { items })
  }

  /// Visits every style rule in document order, descending into nested
  /// at-rule blocks.
  pub fn walk_rules_mut<F>(&mut self, mut visit: F)
  where
    F: FnMut(&mut StyleRule),
  {
    fn walk<F: FnMut(&mut StyleRule)>(items: &mut [CssItem], visit: &mut F) {
      for item in items {
        match item {
          CssItem::Style(rule) => visit(rule),
          CssItem::At(at_rule) => {
            if let AtRuleBlock::Rules(items) = &mut at_rule.block {
              walk(items, visit);
            }
          }
          CssItem::Comment(_) => {}
        }
      }
    }

    walk(&mut self.items, &mut visit);
  }

  /// Immutable counterpart of [`Stylesheet::walk_rules_mut`]
  pub fn walk_rules<F>(&self, mut visit: F)
  where
    F: FnMut(&StyleRule),
  {
    fn walk<F: FnMut(&StyleRule)>(items: &[CssItem], visit: &mut F) {
      for item in items {
        match item {
          CssItem::Style(rule) => visit(rule),
          CssItem::At(at_rule) => {
            if let AtRuleBlock::Rules(items) = &at_rule.block {
              walk(items, visit);
            }
          }
          CssItem::Comment(_) => {}
        }
      }
    }

    walk(&self.items, &mut visit);
  }

  /// Serializes the document back to CSS text. Declaration blocks are
  /// emitted byte-for-byte as they were captured.
  pub fn to_css(&self) -> String {
    let mut output = String::new();
    write_items(&mut output, &self.items);

    if !output.is_empty() {
      output.push('\n');
    }

    output
  }
}

fn write_items(output: &mut String, items: &[CssItem]) {
  for (index, item) in items.iter().enumerate() {
    if index > 0 {
      output.push('\n');
    }

    match item {
      CssItem::Comment(text) => output.push_str(text),
      CssItem::Style(rule) => {
        output.push_str(&rule.selector);
        output.push_str(" {");
        output.push_str(&rule.body);
        output.push('}');
      }
      CssItem::At(at_rule) => {
        output.push('@');
        output.push_str(&at_rule.name);
        if !at_rule.prelude.is_empty() {
          output.push(' ');
          output.push_str(&at_rule.prelude);
        }

        match &at_rule.block {
          AtRuleBlock::None => output.push(';'),
          AtRuleBlock::Opaque(body) => {
            output.push_str(" {");
            output.push_str(body);
            output.push('}');
          }
          AtRuleBlock::Rules(items) => {
            output.push_str(" {\n");
            write_items(output, items);
            output.push_str("\n}");
          }
        }
      }
    }
  }
}

struct Scanner<'a> {
  source: &'a str,
  pos: usize,
}

impl<'a> Scanner<'a> {
  fn new(source: &'a str) -> Self {
    Scanner { source, pos: 0 }
  }

  fn rest(&self) -> &'a str {
    &self.source[self.pos..]
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn bump(&mut self) -> Option<char> {
    let ch = self.peek()?;
    self.pos += ch.len_utf8();
    Some(ch)
  }

  fn skip_whitespace(&mut self) {
    while self.peek().is_some_and(|ch| ch.is_whitespace()) {
      self.bump();
    }
  }

  fn error(&self, message: impl Into<String>) -> Diagnostic {
    DiagnosticBuilder::default()
      .kind(ErrorKind::ParseError)
      .message(message.into())
      .build()
      .unwrap_or_default()
  }

  /// Consumes a `/* ... */` comment, returning it verbatim
  fn read_comment(&mut self) -> Result<String, Diagnostic> {
    let start = self.pos;
    self.pos += 2;

    match self.rest().find("*/") {
      Some(offset) => {
        self.pos += offset + 2;
        Ok(self.source[start..self.pos].to_string())
      }
      None => Err(self.error("unterminated comment")),
    }
  }

  /// Consumes a quoted string, `quote` having already been consumed
  fn skip_string(&mut self, quote: char) -> Result<(), Diagnostic> {
    while let Some(ch) = self.bump() {
      match ch {
        '\\' => {
          self.bump();
        }
        '\n' => return Err(self.error("unterminated string")),
        ch if ch == quote => return Ok(()),
        _ => {}
      }
    }

    Err(self.error("unterminated string"))
  }

  /// Captures everything up to the `}` closing the block opened just before
  /// this call, consuming the closing brace but excluding it from the result.
  fn read_raw_block(&mut self) -> Result<String, Diagnostic> {
    let start = self.pos;
    let mut depth = 1usize;

    loop {
      if self.rest().starts_with("/*") {
        self.read_comment()?;
        continue;
      }

      match self.bump() {
        None => return Err(self.error("unclosed block")),
        Some('"') => self.skip_string('"')?,
        Some('\'') => self.skip_string('\'')?,
        Some('{') => depth += 1,
        Some('}') => {
          depth -= 1;
          if depth == 0 {
            return Ok(self.source[start..self.pos - 1].to_string());
          }
        }
        Some(_) => {}
      }
    }
  }
}

fn parse_items(scanner: &mut Scanner<'_>, nested: bool) -> Result<Vec<CssItem>, Diagnostic> {
  let mut items = Vec::new();

  loop {
    scanner.skip_whitespace();

    if scanner.rest().starts_with("/*") {
      items.push(CssItem::Comment(scanner.read_comment()?));
      continue;
    }

    match scanner.peek() {
      None => {
        if nested {
          return Err(scanner.error("unclosed block"));
        }
        return Ok(items);
      }
      Some('}') => {
        if nested {
          return Ok(items);
        }
        return Err(scanner.error("unmatched '}'"));
      }
      Some('@') => items.push(CssItem::At(parse_at_rule(scanner)?)),
      Some(_) => items.push(CssItem::Style(parse_style_rule(scanner)?)),
    }
  }
}

fn parse_at_rule(scanner: &mut Scanner<'_>) -> Result<AtRule, Diagnostic> {
  scanner.bump();

  let start = scanner.pos;
  while scanner
    .peek()
    .is_some_and(|ch| ch.is_alphanumeric() || ch == '-' || ch == '_')
  {
    scanner.bump();
  }
  let name = scanner.source[start..scanner.pos].to_string();

  if name.is_empty() {
    return Err(scanner.error("expected at-rule name after '@'"));
  }

  let prelude_start = scanner.pos;

  loop {
    if scanner.rest().starts_with("/*") {
      scanner.read_comment()?;
      continue;
    }

    match scanner.peek() {
      // Statement at-rule without a trailing semicolon at end of input
      None => break,
      Some('{') => break,
      Some(';') => break,
      Some('}') => return Err(scanner.error(format!("unexpected '}}' in @{name} prelude"))),
      Some('"') => {
        scanner.bump();
        scanner.skip_string('"')?;
      }
      Some('\'') => {
        scanner.bump();
        scanner.skip_string('\'')?;
      }
      Some(_) => {
        scanner.bump();
      }
    }
  }

  let prelude = scanner.source[prelude_start..scanner.pos].trim().to_string();

  let block = match scanner.peek() {
    Some('{') => {
      scanner.bump();

      if GROUP_RULES.contains(&name.to_ascii_lowercase().as_str()) {
        let items = parse_items(scanner, true)?;
        // parse_items leaves the closing brace for us
        scanner.bump();
        AtRuleBlock::Rules(items)
      } else {
        AtRuleBlock::Opaque(scanner.read_raw_block()?)
      }
    }
    Some(';') => {
      scanner.bump();
      AtRuleBlock::None
    }
    _ => AtRuleBlock::None,
  };

  Ok(AtRule {
    name,
    prelude,
    block,
  })
}

fn parse_style_rule(scanner: &mut Scanner<'_>) -> Result<StyleRule, Diagnostic> {
  let start = scanner.pos;

  loop {
    if scanner.rest().starts_with("/*") {
      scanner.read_comment()?;
      continue;
    }

    match scanner.peek() {
      None => return Err(scanner.error("unexpected end of input, expected '{'")),
      Some('{') => break,
      Some('}') => return Err(scanner.error("unmatched '}'")),
      Some(';') => return Err(scanner.error("unexpected ';', expected '{'")),
      Some('"') => {
        scanner.bump();
        scanner.skip_string('"')?;
      }
      Some('\'') => {
        scanner.bump();
        scanner.skip_string('\'')?;
      }
      Some(_) => {
        scanner.bump();
      }
    }
  }

  let selector = scanner.source[start..scanner.pos].trim().to_string();
  if selector.is_empty() {
    return Err(scanner.error("empty selector"));
  }

  scanner.bump();
  let body = scanner.read_raw_block()?;

  Ok(StyleRule { selector, body })
}
