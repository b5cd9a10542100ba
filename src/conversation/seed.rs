//! Built-in conversations used on first run, before anything was saved.

use serde::{Deserialize, Serialize};

use super::model::{Message, SENDER_CODER, SENDER_USER};

/// Which built-in conversation to start from when storage is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    /// Five messages: factorial request, implementation, execution, explanation.
    #[default]
    Factorial,
    /// The factorial exchange continued to twenty messages, enough to span
    /// several pages at the default page size.
    FactorialExtended,
}

impl Seed {
    pub fn messages(self) -> Vec<Message> {
        let entries: &[(&str, &str)] = match self {
            Self::Factorial => &FACTORIAL[..5],
            Self::FactorialExtended => &FACTORIAL[..],
        };
        entries
            .iter()
            .zip(1u64..)
            .map(|((sender, content), id)| Message::new(id, *sender, *content))
            .collect()
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Factorial => write!(f, "factorial"),
            Self::FactorialExtended => write!(f, "extended"),
        }
    }
}

impl std::str::FromStr for Seed {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "factorial" => Ok(Self::Factorial),
            "extended" | "factorial_extended" => Ok(Self::FactorialExtended),
            _ => Err(format!("Unknown seed: {}", s)),
        }
    }
}

const FACTORIAL: [(&str, &str); 20] = [
    (SENDER_USER, "Write a Python function to calculate factorial."),
    (SENDER_CODER, "Here's a Python function to calculate factorial:"),
    (
        SENDER_CODER,
        "def factorial(n):\n    if n == 0 or n == 1:\n        return 1\n    else:\n        return n * factorial(n-1)",
    ),
    (SENDER_USER, "Execution result: Success"),
    (
        SENDER_CODER,
        "Great! The factorial function has been implemented successfully. You can now use this function to calculate factorials. For example, factorial(5) would return 120.",
    ),
    (SENDER_USER, "Can you explain how the recursive factorial function works?"),
    (SENDER_CODER, "Certainly! Let's break down the recursive factorial function:"),
    (
        SENDER_CODER,
        "1. Base case: If n is 0 or 1, the function returns 1. This is because 0! and 1! are both defined as 1.\n2. Recursive case: For any other number n, the function returns n multiplied by factorial(n-1).\n3. The recursion continues, calling factorial with smaller numbers until it reaches the base case.",
    ),
    (SENDER_USER, "That's helpful. Can you show an example of how it calculates factorial(4)?"),
    (SENDER_CODER, "Sure! Let's walk through the calculation of factorial(4):"),
    (
        SENDER_CODER,
        "factorial(4)\n= 4 * factorial(3)\n= 4 * (3 * factorial(2))\n= 4 * (3 * (2 * factorial(1)))\n= 4 * (3 * (2 * 1))\n= 4 * (3 * 2)\n= 4 * 6\n= 24",
    ),
    (
        SENDER_USER,
        "That's clear now. What about the performance of recursive vs iterative factorial functions?",
    ),
    (SENDER_CODER, "Good question! Let's compare recursive and iterative approaches:"),
    (
        SENDER_CODER,
        "Recursive:\n+ Simple and elegant implementation\n+ Mirrors the mathematical definition closely\n- Can lead to stack overflow for large numbers\n- Generally slower due to function call overhead\n\nIterative:\n+ More efficient in terms of memory usage\n+ Usually faster, especially for large numbers\n- Slightly more complex implementation\n+ No risk of stack overflow",
    ),
    (SENDER_USER, "Interesting. Can you show an iterative version of the factorial function?"),
    (SENDER_CODER, "Certainly! Here's an iterative version of the factorial function:"),
    (
        SENDER_CODER,
        "def factorial_iterative(n):\n    result = 1\n    for i in range(1, n + 1):\n        result *= i\n    return result",
    ),
    (SENDER_USER, "Thanks! This has been very informative."),
    (
        SENDER_CODER,
        "You're welcome! I'm glad I could help you understand factorial functions better. If you have any more questions about this or other programming topics, feel free to ask!",
    ),
    (
        SENDER_USER,
        "I'll keep that in mind. For now, let's end this conversation here.",
    ),
];
