use std::io::Read;

use fixedform_cards::{Card, CardError, CardRepeat, CardStack, Field, FieldCard, FixedTextCard};

/// A small deck: a title line, any number of branch cards and a terminating
/// marker.
fn branch_deck() -> Result<Card, CardError> {
    let branch = FieldCard::new(
        "(I3, F5.4, F8.5, I2, F8.5, F8.5, A8)",
        [
            Field::named("IP"),
            Field::named("SKIN"),
            Field::named("RESIS"),
            Field::named("IX"),
            Field::named("REACT"),
            Field::named("DIAM"),
            Field::named("NAME"),
        ],
    )?;

    Ok(CardStack::new([
        FixedTextCard::new("BRANCH CARDS").into(),
        CardRepeat::new(branch)
            .with_end_marker(FixedTextCard::new("$EOF"))
            .with_name("branches")
            .into(),
    ])
    .into())
}

fn main() {
    if let Err(err) = main_err() {
        eprintln!("error: {err}");
    }
}

fn main_err() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let lines: Vec<&str> = input.lines().collect();

    let mut deck = branch_deck()?;
    deck.read(&lines)?;

    let branches = deck.data();
    eprintln!(
        "read {} branch card(s)",
        branches.get("branches").map_or(0, |list| list.len())
    );

    println!("{}", deck.write()?);
    Ok(())
}
