use super::memory::{ElementSpec, MemorySurface};

const NAVBAR_HEIGHT: f64 = 70.0;

/// The landing page the engine was built for, laid out in a viewport of the given size
///
/// Sections: hero (with particle backdrop and parallax layers), services,
/// about (stat counters), projects and contact (form).
pub fn landing_page(width: f64, height: f64) -> MemorySurface {
    let mut page = MemorySurface::new(width, height);

    // Loader overlay
    page.add(ElementSpec::new("div").id("welcome-loader").rect(0.0, 0.0, width, height).fixed());
    page.add(ElementSpec::new("div").id("progress-track").class("progress-track").fixed());
    page.add(ElementSpec::new("div").id("progress-fill").fixed());
    page.add(ElementSpec::new("span").id("progress-percentage").text("0").fixed());
    page.add(ElementSpec::new("div").class("progress-truck").fixed());
    for (i, label) in [
        "Residential Construction",
        "Commercial Projects",
        "Civil Engineering",
        "Project Management",
    ]
    .iter()
    .enumerate()
    {
        let mut item = ElementSpec::new("div").class("highlight-item").text(label).fixed();
        if i == 0 {
            item = item.class("active");
        }
        page.add(item);
    }
    page.add(ElementSpec::new("p").class("progress-label").text("Loading...").fixed());

    // Navigation
    page.add(
        ElementSpec::new("nav")
            .id("navbar")
            .class("navbar")
            .rect(0.0, 0.0, width, NAVBAR_HEIGHT)
            .fixed(),
    );
    for (href, label) in [
        ("#home", "Home"),
        ("#services", "Services"),
        ("#about", "About"),
        ("#projects", "Projects"),
        ("#contact", "Contact"),
    ] {
        page.add(
            ElementSpec::new("a")
                .class("nav-link")
                .attr("href", href)
                .text(label)
                .fixed(),
        );
    }

    page.add(ElementSpec::new("main").id("main-content").rect(0.0, 0.0, width, 4200.0));

    // Hero
    page.add(
        ElementSpec::new("section")
            .id("home")
            .class("hero")
            .rect(0.0, 0.0, width, 800.0),
    );
    page.add(
        ElementSpec::new("h1")
            .text("Building Excellence Since 1998")
            .rect(40.0, 260.0, width - 80.0, 80.0),
    );
    page.add(
        ElementSpec::new("div")
            .class("parallax-element")
            .attr("data-speed", "0.3")
            .rect(0.0, 120.0, width, 200.0),
    );
    page.add(
        ElementSpec::new("div")
            .class("parallax-element")
            .attr("data-speed", "0.6")
            .rect(0.0, 420.0, width, 200.0),
    );
    page.add(ElementSpec::new("div").class("parallax-element").rect(0.0, 620.0, width, 120.0));

    // Services
    page.add(
        ElementSpec::new("section")
            .id("services")
            .rect(0.0, 800.0, width, 900.0),
    );
    page.add(
        ElementSpec::new("h2")
            .class("reveal")
            .text("Our Services")
            .rect(40.0, 860.0, width - 80.0, 60.0),
    );
    for (i, name) in ["General Contracting", "Design & Build", "Renovation"]
        .iter()
        .enumerate()
    {
        page.add(
            ElementSpec::new("div")
                .class("service-card")
                .class("reveal")
                .text(name)
                .rect(40.0, 980.0 + i as f64 * 220.0, width - 80.0, 180.0),
        );
    }

    // About / stats
    page.add(
        ElementSpec::new("section")
            .id("about")
            .rect(0.0, 1700.0, width, 800.0),
    );
    page.add(
        ElementSpec::new("h2")
            .class("reveal-zoom")
            .text("By the Numbers")
            .rect(40.0, 1760.0, width - 80.0, 60.0),
    );
    for (i, (value, caption)) in [
        ("250", "Projects Completed"),
        ("25", "Years of Experience"),
        ("98", "Client Satisfaction %"),
        ("24/7", "Site Support"),
    ]
    .iter()
    .enumerate()
    {
        let y = 1900.0 + i as f64 * 120.0;
        page.add(
            ElementSpec::new("div")
                .class("stat-card")
                .text(caption)
                .rect(40.0, y, width - 80.0, 100.0),
        );
        page.add(
            ElementSpec::new("span")
                .class("stat-number")
                .text(value)
                .rect(60.0, y + 20.0, 200.0, 60.0),
        );
    }

    // Projects
    page.add(
        ElementSpec::new("section")
            .id("projects")
            .rect(0.0, 2500.0, width, 900.0),
    );
    for (i, (class, name)) in [
        ("reveal-left", "Harbour Towers"),
        ("reveal-right", "Riverside Bridge"),
        ("reveal-left", "Central Library"),
    ]
    .iter()
    .enumerate()
    {
        page.add(
            ElementSpec::new("div")
                .class("project-card")
                .class(class)
                .text(name)
                .rect(40.0, 2580.0 + i as f64 * 260.0, width - 80.0, 220.0),
        );
    }

    // Contact
    page.add(
        ElementSpec::new("section")
            .id("contact")
            .rect(0.0, 3400.0, width, 800.0),
    );
    page.add(
        ElementSpec::new("form")
            .id("contact-form")
            .class("reveal")
            .rect(40.0, 3480.0, width - 80.0, 600.0),
    );
    page.add(
        ElementSpec::new("input")
            .attr("name", "name")
            .rect(60.0, 3520.0, width - 120.0, 40.0),
    );
    page.add(
        ElementSpec::new("input")
            .attr("name", "email")
            .rect(60.0, 3580.0, width - 120.0, 40.0),
    );
    page.add(
        ElementSpec::new("textarea")
            .attr("name", "message")
            .rect(60.0, 3640.0, width - 120.0, 160.0),
    );
    page.add(
        ElementSpec::new("button")
            .attr("type", "submit")
            .text("Send Message")
            .rect(60.0, 3830.0, 200.0, 44.0),
    );

    page
}
