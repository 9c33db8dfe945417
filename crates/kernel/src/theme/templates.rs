//! Built-in templates.
//!
//! Sites override any of these by placing a file with the same name under
//! their template directory, or add `dex/gallery--{selector}.html` style
//! variants for a single list.

pub const PAGE: &str = "dex/page.html";
pub const GALLERY: &str = "dex/gallery.html";
pub const PROFILE: &str = "dex/profile.html";
pub const GROUPS: &str = "dex/groups.html";
pub const CARD: &str = "dex/card.html";
pub const PAGER: &str = "dex/pager.html";
pub const WIDGETS: &str = "dex/widgets.html";

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
</head>
<body class="page-{{ site_page | scrub }}">
<main>
{{ content | safe }}
</main>
</body>
</html>
"#;

const CARD_HTML: &str = r#"<div class="{{ selector }}-card">
{%- if record.profilelink %}<a class="{{ selector }}-link" href="{{ record.profilelink }}">{{ record.profileid }}</a>{% endif %}
{%- if record.name %} <span class="{{ selector }}-name">{{ record.name }}</span>{% endif %}
{%- if record.raritybadge %} {{ record.raritybadge | safe }}{% endif %}
</div>"#;

const PAGER_HTML: &str = r#"<nav class="{{ selector }}-pagination" aria-label="pagination">
{%- if pagination.prev_url %}<a class="page-prev" rel="prev" href="{{ pagination.prev_url }}">&laquo;</a>{% endif %}
{%- for link in pagination.links %}
{%- if link.current %}<span class="page-current">{{ link.number }}</span>
{%- else %}<a class="page-link" href="{{ link.url }}">{{ link.number }}</a>{% endif %}
{%- endfor %}
{%- if pagination.next_url %}<a class="page-next" rel="next" href="{{ pagination.next_url }}">&raquo;</a>{% endif %}
</nav>"#;

const WIDGETS_HTML: &str = r#"{% if widgets.folders %}<nav class="{{ selector }}-folders">
{%- for folder in widgets.folders %}<a class="folder{% if folder.active %} active{% endif %}" href="{{ folder.url }}">{{ folder.name }}</a>{% endfor %}
</nav>{% endif %}
{%- if widgets.filters %}<div class="{{ selector }}-filters">
{%- for filter in widgets.filters %}<label>{{ filter.field }}<select name="{{ filter.field }}" data-clear="{{ filter.clear_url }}">
<option value="">All</option>
{%- for option in filter.options %}<option value="{{ option.value }}" data-url="{{ option.url }}"{% if option.selected %} selected{% endif %}>{{ option.value }}</option>{% endfor %}
</select></label>{% endfor %}
</div>{% endif %}
{%- if widgets.search %}<form class="{{ selector }}-search" method="get" action="{{ widgets.search.action }}">
<input type="search" name="search" value="{{ widgets.search.term }}">
{%- if widgets.search.field_picker %}<select name="searchfield">
{%- for field in widgets.search.fields %}<option value="{{ field }}"{% if widgets.search.selected_field and widgets.search.selected_field == field %} selected{% endif %}>{{ field }}</option>{% endfor %}
</select>{% endif %}
<button type="submit">Search</button>
</form>{% endif %}"#;

const GALLERY_HTML: &str = r#"<section class="{{ selector }}-gallery" data-count="{{ total }}">
{% include "dex/widgets.html" %}
{% if pagination %}{% include "dex/pager.html" %}{% endif %}
{% if records %}<ul class="{{ selector }}-list">
{%- for record in records %}
<li class="{{ selector }}-item" data-profile="{{ record.profileid | default(value='') | scrub }}">{% include "dex/card.html" %}</li>
{%- endfor %}
</ul>{% else %}<p class="{{ selector }}-empty">Nothing here yet.</p>{% endif %}
{% if pagination and pagination.show_bottom %}{% include "dex/pager.html" %}{% endif %}
</section>
"#;

const PROFILE_HTML: &str = r#"<article class="{{ selector }}-profile" data-profile="{{ record.profileid | default(value='') | scrub }}">
<h1>{{ record.profileid | default(value='') }}</h1>
<dl>
{%- for field in fields %}
<dt>{{ field.key }}</dt><dd>{% if field.html %}{{ field.value | safe }}{% else %}{{ field.value }}{% endif %}</dd>
{%- endfor %}
</dl>
{% if prev_next %}<nav class="{{ selector }}-prevnext">
{%- if prev_next.prev %}<a rel="prev" href="{{ prev_next.prev.url }}">{{ prev_next.prev.id }}</a>{% endif %}
{%- if prev_next.next %}<a rel="next" href="{{ prev_next.next.url }}">{{ prev_next.next.id }}</a>{% endif %}
</nav>{% endif %}
<a class="{{ selector }}-back" href="{{ gallery_url }}">Back to gallery</a>
</article>
"#;

const GROUPS_HTML: &str = r#"<div class="{{ selector }}-groups">
{%- for group in groups %}
<section class="{{ selector }}-group" data-group="{{ group.key | scrub }}">
<h2>{% if group.key %}{{ group.key }}{% else %}Other{% endif %}</h2>
{{ group.html | safe }}
</section>
{%- endfor %}
</div>
"#;

/// Every built-in template with its name.
pub fn builtin() -> Vec<(&'static str, &'static str)> {
    vec![
        (PAGE, PAGE_HTML),
        (CARD, CARD_HTML),
        (PAGER, PAGER_HTML),
        (WIDGETS, WIDGETS_HTML),
        (GALLERY, GALLERY_HTML),
        (PROFILE, PROFILE_HTML),
        (GROUPS, GROUPS_HTML),
    ]
}
