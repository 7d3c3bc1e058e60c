use std::fmt::{self, Write};

use persona_ox::{AnalysisReport, Persona};

pub const ABOUT: &str = "This tool leverages AI to generate detailed marketing personas and insights \
tailored to specific keywords. It automates the process of understanding user intent and creating \
targeted marketing strategies by generating personas and addressing key consumer questions and concerns.";

const RULE: &str = "---";

pub fn about(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "How does it work?")?;
    writeln!(out, "{ABOUT}")?;
    writeln!(out)
}

pub fn report(out: &mut impl Write, report: &AnalysisReport) -> fmt::Result {
    writeln!(out, "Search Intent")?;
    writeln!(out, "{}", report.intent)?;
    writeln!(out)?;

    writeln!(out, "Generated Personas")?;
    for persona in &report.personas {
        persona_card(out, persona)?;
    }

    writeln!(out, "Persona Motivation Analysis")?;
    for (name, answers) in report.answers_by_persona() {
        writeln!(out, "== {name} ==")?;
        for record in answers {
            writeln!(out, "Q: {}", record.question)?;
            writeln!(out, "A: {}", record.answer)?;
            writeln!(out, "{RULE}")?;
        }
    }
    Ok(())
}

pub fn persona_card(out: &mut impl Write, persona: &Persona) -> fmt::Result {
    writeln!(out, "## {}", persona.name())?;
    writeln!(out, "Avatar: {}", persona.avatar_url())?;

    writeln!(out, "Demographics")?;
    for (field, value) in persona.demographics.fields() {
        writeln!(out, "  {}: {value}", field.label)?;
    }

    writeln!(out, "Psychographics")?;
    for (field, values) in persona.psychographics.fields() {
        writeln!(out, "  {}: {}", field.label, values.join(", "))?;
    }

    writeln!(out, "Behavior and Decision Making")?;
    for (field, values) in persona.behavior_and_decision_making.fields() {
        writeln!(out, "  {}: {}", field.label, values.join(", "))?;
    }
    writeln!(out)
}
