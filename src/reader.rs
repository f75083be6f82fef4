const OPEN_DELIMITERS: [&str; 3] = ["{{", "{%", "{#"];

/// One fragment of template source, in document order.
///
/// Tag variants carry the inner text with surrounding whitespace trimmed.
/// The reader does no validation beyond delimiter matching; malformed tag
/// contents are caught by the compiler downstream.
#[derive(PartialEq, Debug)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Expression(&'a str),
    Statement(&'a str),
    Comment(&'a str),
}

#[derive(Clone)]
pub(crate) struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Reader { input, pos: 0 }
    }

    pub(crate) fn pop_front(&mut self) -> Option<Token<'a>> {
        if self.pos == self.input.len() {
            None
        } else {
            let tail = &self.input[self.pos..];
            let token = match tail.open_delimiter() {
                Some(open) => self.read_tag(tail, open),
                None => self.read_text(tail),
            };
            Some(token)
        }
    }

    fn read_text(&mut self, tail: &'a str) -> Token<'a> {
        let after_text = tail.find_open_delimiter().unwrap_or(tail.len());
        self.pos += after_text;
        Token::Text(&tail[..after_text])
    }

    /// Non-greedy scan to the close delimiter paired with `open`. Tags may
    /// span newlines. A tag that never closes is plain text to the end of
    /// input, like any other undelimited run.
    fn read_tag(&mut self, tail: &'a str, open: &str) -> Token<'a> {
        let close = match open {
            "{{" => "}}",
            "{%" => "%}",
            _ => "#}",
        };
        match tail[open.len()..].find(close) {
            Some(p) => {
                let inner = tail[open.len()..open.len() + p].trim();
                self.pos += open.len() + p + close.len();
                match open {
                    "{{" => Token::Expression(inner),
                    "{%" => Token::Statement(inner),
                    _ => Token::Comment(inner),
                }
            },
            None => {
                self.pos = self.input.len();
                Token::Text(tail)
            }
        }
    }
}


trait ReaderStringOps {
    fn open_delimiter(&self) -> Option<&'static str>;
    fn find_open_delimiter(&self) -> Option<usize>;
}

impl ReaderStringOps for str {
    fn open_delimiter(&self) -> Option<&'static str> {
        OPEN_DELIMITERS.iter()
            .find(|od| self.starts_with(*od))
            .copied()
    }

    fn find_open_delimiter(&self) -> Option<usize> {
        OPEN_DELIMITERS.iter()
            .filter_map(|od| self.find(od))
            .min()
    }
}
