use crate::surface::{classes, Surface};
use crate::Result;

/// Card groups and the delay between consecutive entrances, in milliseconds
pub const CARD_GROUPS: [(&str, u64); 4] = [
    (".service-card", 100),
    (".project-card", 150),
    (".credential-card", 120),
    (".stat-card", 80),
];

/// Give each match of `selector` an entrance delay of `index * delay_ms`
pub fn stagger(surface: &mut dyn Surface, selector: &str, delay_ms: u64) -> Result<usize> {
    let elements = surface.query(selector)?;
    for (index, id) in elements.iter().enumerate() {
        surface.set_style(*id, "animation-delay", &format!("{}ms", index as u64 * delay_ms))?;
        surface.set_class(*id, classes::FADE_IN_UP, true)?;
    }
    Ok(elements.len())
}

/// Stagger every card group on the page
pub fn stagger_cards(surface: &mut dyn Surface) -> Result<usize> {
    let mut total = 0;
    for (selector, delay) in CARD_GROUPS {
        total += stagger(surface, selector, delay)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::landing_page;

    #[test]
    fn test_stagger_delays() {
        let mut surface = landing_page(1280.0, 800.0);
        assert_eq!(stagger_cards(&mut surface).unwrap(), 10);

        let projects = surface.query(".project-card").unwrap();
        let delays: Vec<_> = projects
            .iter()
            .map(|id| surface.style(*id, "animation-delay").unwrap())
            .collect();
        assert_eq!(delays, vec!["0ms", "150ms", "300ms"]);
        assert!(projects.iter().all(|id| surface.has_class(*id, classes::FADE_IN_UP)));
    }
}
