//lib.rs
pub mod lexer;
pub mod parser;
pub mod inverter;
pub mod synth;
pub mod sim;
pub mod verify;
pub mod generator;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

pub const MAX_VERIFY_INPUTS: usize = 20; // 2^20 assignments is the exhaustive-sweep ceiling
pub const RAIL_GND: &str = "GND";
pub const RAIL_VDD: &str = "VDD";
pub const RAIL_OUTPUT: &str = "OUTPUT";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
    #[error("no value bound for input signal '{0}'")]
    UnboundVariable(String),
}

/// Atomic unit produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    And,
    Or,
    Not,
    Var(String),
}

/// A variable reference with its polarity. After NOT elimination this is the
/// only place inversion can live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub name: String,
    pub negated: bool,
}

impl Literal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negated: false,
        }
    }

    pub fn complement(&self) -> Self {
        Self {
            name: self.name.clone(),
            negated: !self.negated,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "-{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Element of a postfix (reverse Polish) sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixTok {
    And,
    Or,
    Not,
    Lit(Literal),
}

impl fmt::Display for PostfixTok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixTok::And => write!(f, "."),
            PostfixTok::Or => write!(f, "+"),
            PostfixTok::Not => write!(f, "~"),
            PostfixTok::Lit(lit) => write!(f, "{}", lit),
        }
    }
}

/// An electrical node. Plain integers during synthesis; the two network
/// boundaries are renamed to rails when the build finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Junction {
    Internal(u32),
    Gnd,
    Vdd,
    Output,
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Junction::Internal(n) => write!(f, "{}", n),
            Junction::Gnd => write!(f, "{}", RAIL_GND),
            Junction::Vdd => write!(f, "{}", RAIL_VDD),
            Junction::Output => write!(f, "{}", RAIL_OUTPUT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Pmos,
    Nmos,
}

impl Polarity {
    pub fn device_prefix(self) -> &'static str {
        match self {
            Polarity::Pmos => "PMOS",
            Polarity::Nmos => "NMOS",
        }
    }

    /// Supply rail this network pulls the output toward.
    pub fn rail(self) -> Junction {
        match self {
            Polarity::Pmos => Junction::Vdd,
            Polarity::Nmos => Junction::Gnd,
        }
    }

    /// PMOS devices conduct on a low gate, NMOS on a high gate.
    pub fn conducts(self, gate_value: bool) -> bool {
        match self {
            Polarity::Pmos => !gate_value,
            Polarity::Nmos => gate_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transistor {
    pub name: String,
    pub source: Junction,
    pub drain: Junction,
    pub gate: Literal,
}

/// One pull network: an ordered list of transistors sharing a junction
/// numbering space. Read-only once synthesis completes.
#[derive(Debug, Clone)]
pub struct Network {
    pub polarity: Polarity,
    pub transistors: Vec<Transistor>,
}

/// The complete synthesized circuit for one boolean expression.
#[derive(Debug, Clone)]
pub struct Netlist {
    pub pull_up: Network,
    pub pull_down: Network,
    /// Sorted, deduplicated input signal names discovered from the expression.
    pub inputs: Vec<String>,
    /// Postfix form of the original expression, kept as the truth oracle
    /// for verification.
    pub postfix: Vec<PostfixTok>,
}

/// Boolean values for every input signal of one simulation call. Complement
/// aliases are derived here, so they can never disagree with the direct value.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    values: HashMap<String, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), value);
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut assignment = Self::new();
        for (name, value) in pairs {
            assignment.set(name, value);
        }
        assignment
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Value seen at a transistor gate: the signal value, complemented when
    /// the literal is negated.
    pub fn value_of(&self, lit: &Literal) -> Result<bool, CompileError> {
        let direct = self
            .values
            .get(&lit.name)
            .copied()
            .ok_or_else(|| CompileError::UnboundVariable(lit.name.clone()))?;
        Ok(if lit.negated { !direct } else { direct })
    }
}

/// Run the whole translation pipeline on a raw expression string:
/// tokenize, convert to postfix, eliminate NOT twice, synthesize both
/// pull networks.
pub fn compile(expr: &str) -> Result<Netlist, CompileError> {
    let tokens = lexer::tokenize(expr);
    let postfix = parser::to_postfix(&tokens)?;
    if postfix.is_empty() {
        return Err(CompileError::MalformedExpression(
            "empty expression".to_string(),
        ));
    }

    let inputs = parser::discover_inputs(&postfix);

    // Pull-up form: the expression itself. Pull-down form: the expression
    // under one extra top-level NOT.
    let pull_up_form = inverter::eliminate_not(postfix.clone())?;
    let mut negated = postfix.clone();
    negated.push(PostfixTok::Not);
    let pull_down_form = inverter::eliminate_not(negated)?;

    // One junction counter across both builds keeps the numbering spaces
    // disjoint until the boundary renaming.
    let mut next_junction = 0u32;
    let pull_down = synth::build_network(&pull_down_form, Polarity::Nmos, &mut next_junction)?;
    let pull_up = synth::build_network(&pull_up_form, Polarity::Pmos, &mut next_junction)?;

    Ok(Netlist {
        pull_up,
        pull_down,
        inputs,
        postfix,
    })
}
