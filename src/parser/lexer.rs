use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};
use crate::grammar::EPSILON;

#[derive(PartialEq, Debug)]
pub enum Token {
    Equals,
    Or,
    Epsilon,
    Nonterminal(String),
    Terminal(String)
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '=' || c == '|' || c == '\"'
}

pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume open quote
    let token_text = line.peeking_take_while(|&c| c != '\"').collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != Some('\"') {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    Ok(Token::Terminal(token_text))
}

// A bare word, which is a nonterminal unless it is the epsilon marker
pub fn lex_word(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    let word: String = line.peeking_take_while(|&c| !is_delimiter(c)).collect();

    if word == EPSILON {
        Ok(Token::Epsilon)
    } else {
        Ok(Token::Nonterminal(word))
    }
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if *c == '\"' {
            tokens.push(lex_terminal(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_word(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    Ok(tokens)
}
