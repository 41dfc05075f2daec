use crate::detail::DetailView;
use crate::page::{Card, Page};

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn image_tag(image: Option<&str>, alt: &str, class: &str) -> String {
    match image {
        Some(src) => format!(
            r#"<img class="{class}" src="{}" alt="{}"/>"#,
            escape_html(src),
            escape_html(alt)
        ),
        None => String::new(),
    }
}

fn render_sidebar(page: &Page) -> String {
    let mut items = String::new();
    for label in &page.sidebar.categories {
        let class = if page.sidebar.active() == Some(label.as_str()) {
            r#" class="active""#
        } else {
            ""
        };
        items.push_str(&format!(
            "      <li{class}>{}</li>\n",
            escape_html(label)
        ));
    }
    let hidden = if page.sidebar.hidden { " hidden" } else { "" };
    format!("    <ul class=\"pokemonSideBar{hidden}\">\n{items}    </ul>\n")
}

fn render_card(card: &Card) -> String {
    let style = if card.visible {
        ""
    } else {
        r#" style="display: none""#
    };
    format!(
        r#"      <div class="card" data-number="{number}"{style}>
        {image}
        <div class="pokemon-info">
          <h3 class="pokemon-name">{name}</h3>
          <p class="pokemon-number">{number_label}</p>
          <p class="pokemon-types">{types}</p>
          <p class="pokemon-species">{species}</p>
        </div>
      </div>
"#,
        number = card.number,
        image = image_tag(card.image.as_deref(), &card.name, "pokemon-image"),
        name = escape_html(&card.name),
        number_label = escape_html(&card.number_label),
        types = escape_html(&card.types_label),
        species = escape_html(&card.species),
    )
}

fn render_modal(view: &DetailView) -> String {
    let mut stats = String::new();
    for stat in &view.stats {
        stats.push_str(&format!(
            r#"          <div class="stat-bar">
            <span class="stat-name">{}</span>
            <div class="stat-bar-fill" style="width: {:.1}%"></div>
          </div>
"#,
            escape_html(&stat.label),
            stat.fill_percent
        ));
    }

    format!(
        r#"    <div class="modal">
      <div class="modalContent">
        <span class="close">&times;</span>
        <h2>{title} {number_label}</h2>
        {image}
        <div class="pokemon-details">
          <p>{types}</p>
          <p>{species}</p>
          <p>{height}</p>
          <p>{weight}</p>
          <p>{abilities}</p>
        </div>
        <div class="pokemon-stats">
          <h3>Base Stats</h3>
{stats}        </div>
        <div class="pokemon-moves">
          <h3>Moves</h3>
          <p class="moves-list">{moves}</p>
        </div>
      </div>
    </div>
"#,
        title = escape_html(&view.title),
        number_label = escape_html(&view.number_label),
        image = image_tag(view.image.as_deref(), &view.title, "modal-image"),
        types = escape_html(&view.types_label),
        species = escape_html(&view.species),
        height = escape_html(&view.height_label),
        weight = escape_html(&view.weight_label),
        abilities = escape_html(&view.abilities_label),
        moves = escape_html(&view.moves_label),
    )
}

/// Standalone snapshot of the page: sidebar, every loaded card (hidden ones
/// keep `display: none`) and the overlay when it is open.
pub fn render_html(page: &Page) -> Vec<u8> {
    let sidebar = render_sidebar(page);
    let cards: String = page.container.cards().iter().map(render_card).collect();
    let modal = match page.overlay.content() {
        Some(view) if page.overlay.is_open() => render_modal(view),
        _ => String::new(),
    };
    let container_class = if page.container.full_width {
        "pokemon-container full-width"
    } else {
        "pokemon-container"
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Pokedex</title>
  <style>
    body {{
      font-family: 'Inter', sans-serif;
      margin: 0;
      display: flex;
    }}
    .pokemonSideBar {{
      list-style: none;
      padding: 1rem;
      min-width: 160px;
    }}
    .pokemonSideBar.hidden {{
      display: none;
    }}
    .pokemonSideBar li.active {{
      font-weight: 700;
      color: #135bec;
    }}
    .pokemon-container {{
      display: grid;
      grid-template-columns: repeat(4, 1fr);
      gap: 1rem;
      padding: 1rem;
      flex: 1;
    }}
    .pokemon-container.full-width {{
      width: 100%;
    }}
    .card {{
      border: 1px solid #e2e8f0;
      border-radius: 0.75rem;
      padding: 1rem;
    }}
    .pokemon-image, .modal-image {{
      width: 100%;
    }}
    .modal {{
      position: fixed;
      inset: 0;
      background: rgba(15, 23, 42, 0.6);
      display: flex;
      align-items: center;
      justify-content: center;
    }}
    .modalContent {{
      background: #fff;
      border-radius: 1rem;
      padding: 2rem;
      max-width: 640px;
    }}
    .stat-bar {{
      background: #e2e8f0;
      border-radius: 9999px;
      margin: 0.25rem 0;
    }}
    .stat-bar-fill {{
      background: #22c55e;
      height: 0.5rem;
      border-radius: 9999px;
    }}
  </style>
</head>
<body>
{sidebar}    <div class="{container_class}">
{cards}    </div>
{modal}</body>
</html>
"####,
    );

    html.into_bytes()
}
