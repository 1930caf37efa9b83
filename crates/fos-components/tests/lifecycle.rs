//! Component lifecycle tests
//!
//! Components driven through a `Page`: construction, reflection,
//! connection and the Reference Pass.

use std::rc::Rc;

use fos_components::{
    Bindings, ComponentError, Context, CustomElement, CustomElementRegistry, ElementConfig, Page,
    RecordingDiagnostics, Template,
};
use fos_dom::{DomTree, NodeId, Selector};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct UserCard {
    name: Option<String>,
    setter_calls: usize,
    hook_calls: usize,
    events: Vec<String>,
}

impl CustomElement for UserCard {
    fn config() -> ElementConfig {
        ElementConfig::default().with_styles(":host { display: block; }")
    }

    fn bindings() -> Bindings<Self> {
        Bindings::new()
            .observe_with("name", |card: &mut UserCard, value| {
                card.setter_calls += 1;
                card.name = value.map(str::to_string);
            })
            .observe("email")
            .observe("first-name")
            .observe("avatar-url")
            .property("name", |card: &UserCard| card.name.clone())
    }

    fn init(&mut self, cx: &mut Context<'_>) -> Result<(), ComponentError> {
        let children = cx.tree().children(cx.root()).count();
        self.events.push(format!(
            "init initialized={} connected={} children={children}",
            cx.is_initialized(),
            cx.is_connected(),
        ));
        Ok(())
    }

    fn render(&self, cx: &mut Context<'_>) -> DomTree {
        cx.html(&Template::from(concat!(
            "<h2>({name})</h2>",
            r#"<p class="email">({email})</p>"#,
            r#"<p class="first">({firstName})</p>"#,
            r#"<a class="profile" title="({name})">profile</a>"#,
            r#"<img data-ref="avatarUrl">"#,
        )))
    }

    fn connected(&mut self, cx: &mut Context<'_>) -> Result<(), ComponentError> {
        let heading = cx.select("h2").map(|h| cx.tree().text_content(h)).unwrap_or_default();
        self.events.push(format!("connected connected={} heading={heading}", cx.is_connected()));
        Ok(())
    }

    fn attribute_changed(
        &mut self,
        _cx: &mut Context<'_>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Result<(), ComponentError> {
        self.hook_calls += 1;
        Ok(())
    }
}

/// No render: falls back to the warning panel
#[derive(Default)]
struct Bare;

impl CustomElement for Bare {}

/// Renders into the host element
#[derive(Default)]
struct LightCard;

impl CustomElement for LightCard {
    fn config() -> ElementConfig {
        ElementConfig::light().with_styles("p { color: red; }")
    }

    fn bindings() -> Bindings<Self> {
        Bindings::new().observe("label")
    }

    fn render(&self, cx: &mut Context<'_>) -> DomTree {
        cx.html(&Template::from("<p>({label})</p>"))
    }
}

/// Renders a nested user card
#[derive(Default)]
struct Profile;

impl CustomElement for Profile {
    fn render(&self, cx: &mut Context<'_>) -> DomTree {
        cx.html(&Template::from(r#"<section><user-card name="Zed"></user-card></section>"#))
    }
}

/// Two profiles deep plus light-tree cards
#[derive(Default)]
struct Directory;

impl CustomElement for Directory {
    fn render(&self, cx: &mut Context<'_>) -> DomTree {
        cx.html(&Template::from(concat!(
            "<x-profile></x-profile>",
            r#"<ul><li><user-card name="A"></user-card></li><li><user-card name="B"></user-card></li></ul>"#,
            "<x-profile></x-profile>",
        )))
    }
}

/// Init fails on the first attempt only
#[derive(Default)]
struct Flaky {
    attempts: usize,
}

impl CustomElement for Flaky {
    fn init(&mut self, cx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.attempts += 1;
        if self.attempts == 1 {
            cx.decorate("div > { color: red; }")?;
        }
        Ok(())
    }

    fn render(&self, cx: &mut Context<'_>) -> DomTree {
        cx.html(&Template::from("<p>ready</p>"))
    }
}

fn page() -> (Page, Rc<RecordingDiagnostics>) {
    init_tracing();
    let mut registry = CustomElementRegistry::new();
    registry.define::<UserCard>("user-card").unwrap();
    registry.define::<Bare>("x-bare").unwrap();
    registry.define::<LightCard>("light-card").unwrap();
    registry.define::<Profile>("x-profile").unwrap();
    registry.define::<Directory>("x-directory").unwrap();
    registry.define::<Flaky>("x-flaky").unwrap();

    let diagnostics = Rc::new(RecordingDiagnostics::new());
    let page = Page::with_diagnostics(registry, diagnostics.clone());
    (page, diagnostics)
}

fn query(tree: &DomTree, scope: NodeId, selector: &str) -> Option<NodeId> {
    tree.query_selector(scope, &Selector::parse(selector).unwrap())
}

/// Text of the first match inside the host's shadow root
fn shadow_text(page: &Page, host: NodeId, selector: &str) -> Option<String> {
    let root = page.tree().shadow_root(host)?;
    let id = query(page.tree(), root, selector)?;
    Some(page.tree().text_content(id))
}

fn card(page: &Page, host: NodeId) -> &UserCard {
    page.component::<UserCard>(host).unwrap().state()
}

#[test]
fn test_isolated_root_adopts_static_styles() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    let component = page.component::<UserCard>(host).unwrap();
    assert_ne!(component.root(), host);
    assert_eq!(page.tree().shadow_root(host), Some(component.root()));
    assert_eq!(component.adopted_style_sheets().len(), 1);
    assert!(component.adopted_style_sheets()[0].css_text().contains(":host"));
    assert!(!component.is_initialized());
}

#[test]
fn test_decorate_accumulates_in_order() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    let component = page.component_mut::<UserCard>(host).unwrap();
    component.decorate(".a { color: red; }").unwrap();
    component.decorate([".b { color: blue; }", ".c { color: green; }"]).unwrap();

    let sheets = component.adopted_style_sheets();
    assert_eq!(sheets.len(), 4);
    assert!(sheets[1].css_text().contains(".a"));
    assert!(sheets[2].css_text().contains(".b"));
    assert!(sheets[3].css_text().contains(".c"));
}

#[test]
fn test_invalid_style_keeps_adopted_sheets() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    let component = page.component_mut::<UserCard>(host).unwrap();
    let result = component.decorate([".ok { color: red; }", "div > { color: red; }"]);
    assert!(matches!(result, Err(ComponentError::Style(_))));
    assert_eq!(component.adopted_style_sheets().len(), 1);
}

#[test]
fn test_light_dom_renders_into_host() {
    let (mut page, diagnostics) = page();
    let host = page.create_element("light-card").unwrap();
    page.set_attribute(host, "label", "Hi").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    assert_eq!(page.tree().shadow_root(host), None);
    let component = page.component_mut::<LightCard>(host).unwrap();
    assert_eq!(component.root(), host);
    assert!(component.adopted_style_sheets().is_empty());
    assert!(matches!(
        component.decorate("p { color: blue; }"),
        Err(ComponentError::NotIsolated { .. })
    ));

    let p = query(page.tree(), host, "p").unwrap();
    assert_eq!(page.tree().text_content(p), "Hi");
    assert!(diagnostics.warnings().is_empty());
}

#[test]
fn test_setter_invoked_once_with_new_value() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    page.set_attribute(host, "name", "Ada").unwrap();
    assert_eq!(card(&page, host).setter_calls, 1);
    assert_eq!(card(&page, host).name.as_deref(), Some("Ada"));
    // setter-backed attributes do not touch the property bag
    assert!(page.component::<UserCard>(host).unwrap().properties().is_empty());
}

#[test]
fn test_same_value_is_noop() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    page.set_attribute(host, "name", "Ada").unwrap();
    page.set_attribute(host, "name", "Ada").unwrap();
    assert_eq!(card(&page, host).setter_calls, 1);
    assert_eq!(card(&page, host).hook_calls, 1);
}

#[test]
fn test_removing_unset_attribute_is_noop() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    page.remove_attribute(host, "first-name").unwrap();
    page.remove_attribute(host, "name").unwrap();

    let component = page.component::<UserCard>(host).unwrap();
    assert!(component.properties().is_empty());
    assert_eq!(component.state().setter_calls, 0);
    assert_eq!(component.state().hook_calls, 0);
}

#[test]
fn test_same_value_leaves_rendered_markers_alone() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    page.set_attribute(host, "email", "a@b.com").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();
    assert_eq!(card(&page, host).hook_calls, 1);

    // hand-edit the marker; a same-value set must not rewrite it
    let marker = page
        .with_component::<UserCard, _>(host, |c, tree| {
            let marker = c.select(tree, ".email span").unwrap();
            tree.set_text_content(marker, "edited").unwrap();
            tree.set_attribute(marker, "data-value", "stale").unwrap();
            marker
        })
        .unwrap();

    page.set_attribute(host, "email", "a@b.com").unwrap();
    assert_eq!(page.tree().text_content(marker), "edited");
    assert_eq!(page.tree().get_attribute(marker, "data-value"), Some("stale"));
    assert_eq!(card(&page, host).hook_calls, 1);
}

#[test]
fn test_repeated_updates_keep_tree_size() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();
    page.set_attribute(host, "email", "v0").unwrap();

    let len = page.tree().len();
    for i in 1..50 {
        page.set_attribute(host, "email", &format!("v{i}")).unwrap();
    }
    assert_eq!(page.tree().len(), len);
    assert_eq!(shadow_text(&page, host, ".email").as_deref(), Some("v49"));
}

#[test]
fn test_failed_init_is_retried_on_next_connection() {
    let (mut page, _) = page();
    let host = page.create_element("x-flaky").unwrap();
    let body = page.body();

    let result = page.append_child(body, host);
    assert!(matches!(result, Err(ComponentError::Style(_))));
    let component = page.component::<Flaky>(host).unwrap();
    assert!(!component.is_initialized());
    assert!(!component.is_connected());
    assert_eq!(page.tree().children(component.root()).count(), 0);

    page.with_component::<Flaky, _>(host, |c, tree| c.connected_callback(tree))
        .unwrap()
        .unwrap();
    let component = page.component::<Flaky>(host).unwrap();
    assert!(component.is_initialized());
    assert!(component.is_connected());
    assert_eq!(component.state().attempts, 2);
    assert_eq!(shadow_text(&page, host, "p").as_deref(), Some("ready"));
}

#[test]
fn test_attribute_without_setter_sets_camel_case_property() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    page.set_attribute(host, "first-name", "Ada").unwrap();
    let component = page.component::<UserCard>(host).unwrap();
    assert_eq!(component.property("firstName").as_deref(), Some("Ada"));
    assert_eq!(component.properties().get("first-name"), None);

    page.remove_attribute(host, "first-name").unwrap();
    let component = page.component::<UserCard>(host).unwrap();
    assert_eq!(component.property("firstName"), None);
}

#[test]
fn test_unobserved_attribute_is_ignored() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    page.set_attribute(host, "title", "x").unwrap();
    let component = page.component::<UserCard>(host).unwrap();
    assert!(component.properties().is_empty());
    assert_eq!(component.state().setter_calls, 0);
}

#[test]
fn test_attribute_set_before_connect_is_rendered() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    page.set_attribute(host, "email", "a@b.com").unwrap();

    // nothing rendered yet
    let root = page.tree().shadow_root(host).unwrap();
    assert_eq!(page.tree().children(root).count(), 0);

    let body = page.body();
    page.append_child(body, host).unwrap();

    assert_eq!(shadow_text(&page, host, ".email").as_deref(), Some("a@b.com"));
    let marker = query(page.tree(), root, r#"[data-ref="email"]"#).unwrap();
    assert_eq!(page.tree().get_attribute(marker, "data-value"), Some("a@b.com"));
}

#[test]
fn test_lifecycle_order_and_single_connection() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    page.set_attribute(host, "name", "Ada").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let component = page.component::<UserCard>(host).unwrap();
    assert!(component.is_initialized());
    assert!(component.is_connected());
    assert_eq!(component.state().events, vec![
        "init initialized=true connected=false children=0".to_string(),
        "connected connected=true heading=Ada".to_string(),
    ]);

    // a second connection is ignored
    page.with_component::<UserCard, _>(host, |c, tree| c.connected_callback(tree))
        .unwrap()
        .unwrap();
    let root = page.tree().shadow_root(host).unwrap();
    let headings = page.tree().query_selector_all(root, &Selector::parse("h2").unwrap());
    assert_eq!(headings.len(), 1);
    assert_eq!(card(&page, host).events.len(), 2);
}

#[test]
fn test_attribute_change_refreshes_only_changed_key() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    page.set_attribute(host, "name", "Ada").unwrap();
    page.set_attribute(host, "email", "a@b.com").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    // hand-edit the email marker; a refresh of `name` must leave it alone
    page.with_component::<UserCard, _>(host, |c, tree| {
        let email = c.select(tree, ".email span").unwrap();
        tree.set_text_content(email, "edited").unwrap();
    });

    page.set_attribute(host, "name", "Bob").unwrap();
    assert_eq!(shadow_text(&page, host, "h2").as_deref(), Some("Bob"));
    assert_eq!(shadow_text(&page, host, ".email").as_deref(), Some("edited"));

    page.set_attribute(host, "email", "c@d.com").unwrap();
    assert_eq!(shadow_text(&page, host, ".email").as_deref(), Some("c@d.com"));
}

#[test]
fn test_companion_attribute_binding() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    page.set_attribute(host, "name", "Ada").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let root = page.tree().shadow_root(host).unwrap();
    let link = query(page.tree(), root, ".profile").unwrap();
    assert_eq!(page.tree().get_attribute(link, "title"), Some("Ada"));
    assert_eq!(page.tree().get_attribute(link, "data-ref-title"), Some("name"));
    assert_eq!(page.tree().get_attribute(link, "data-ref"), Some(""));
    assert_eq!(page.tree().text_content(link), "profile");

    // refreshed after a change to any property
    page.set_attribute(host, "email", "a@b.com").unwrap();
    page.with_component::<UserCard, _>(host, |c, _| c.state_mut().name = Some("Eve".into()));
    page.set_attribute(host, "email", "c@d.com").unwrap();
    assert_eq!(page.tree().get_attribute(link, "title"), Some("Eve"));
}

#[test]
fn test_img_marker_sets_src() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let root = page.tree().shadow_root(host).unwrap();
    let img = query(page.tree(), root, "img").unwrap();
    assert_eq!(page.tree().get_attribute(img, "src"), None);

    page.set_attribute(host, "avatar-url", "ada.png").unwrap();
    assert_eq!(page.tree().get_attribute(img, "src"), Some("ada.png"));
    assert_eq!(page.tree().get_attribute(img, "data-value"), Some("ada.png"));
}

#[test]
fn test_unresolved_marker_keeps_label() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    assert_eq!(shadow_text(&page, host, ".email").as_deref(), Some("email"));
}

#[test]
fn test_missing_render_uses_fallback_and_warns() {
    let (mut page, diagnostics) = page();
    let host = page.create_element("x-bare").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let text = shadow_text(&page, host, "div").unwrap();
    assert!(text.contains("<x-bare>"), "{text}");

    let warnings = diagnostics.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].tag, "x-bare");
    assert!(page.component::<Bare>(host).unwrap().is_connected());
}

#[test]
fn test_scoped_queries_stay_inside_shadow_root() {
    let (mut page, diagnostics) = page();
    let host = page.create_element("user-card").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let component = page.component::<UserCard>(host).unwrap();
    let tree = page.tree();
    assert!(component.select(tree, "h2").is_some());
    assert_eq!(component.select_all(tree, "p").len(), 2);
    assert!(component.select(tree, "table").is_none());
    assert!(component.select_all(tree, "table").is_empty());

    let section = component.select(tree, ".email").unwrap();
    assert!(component.select_in(tree, "span", section).is_some());
    assert_eq!(component.select_all_in(tree, "h2", section), Vec::<NodeId>::new());

    // the document cannot see into the shadow root
    assert!(query(tree, tree.root(), "h2").is_none());

    // bad selectors report and match nothing
    assert!(component.select(tree, "p >").is_none());
    assert_eq!(diagnostics.warnings().len(), 1);
}

#[test]
fn test_set_template_appends() {
    let (mut page, _) = page();
    let host = page.create_element("user-card").unwrap();

    page.with_component::<UserCard, _>(host, |c, tree| {
        let fragment = fos_components::html(&Template::from("<hr>"));
        c.set_template(tree, &fragment).unwrap();
        c.set_template(tree, &fragment).unwrap();
    });

    let root = page.tree().shadow_root(host).unwrap();
    assert_eq!(page.tree().children(root).count(), 2);
}

#[test]
fn test_nested_component_is_upgraded_and_connected() {
    let (mut page, _) = page();
    let host = page.create_element("x-profile").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let inner = page
        .with_component::<Profile, _>(host, |c, tree| c.select(tree, "user-card"))
        .flatten()
        .unwrap();

    let component = page.component::<UserCard>(inner).unwrap();
    assert!(component.is_connected());
    assert_eq!(component.state().name.as_deref(), Some("Zed"));
    assert_eq!(shadow_text(&page, inner, "h2").as_deref(), Some("Zed"));
}

#[test]
fn test_detached_host_is_not_connected() {
    let (mut page, _) = page();
    let wrapper = page.create_element("div").unwrap();
    let host = page.create_element("user-card").unwrap();
    page.append_child(wrapper, host).unwrap();
    assert!(!page.component::<UserCard>(host).unwrap().is_connected());

    let body = page.body();
    page.append_child(body, wrapper).unwrap();
    assert!(page.component::<UserCard>(host).unwrap().is_connected());
}

#[test]
fn test_nested_hosts_connect_once() {
    let (mut page, _) = page();
    let host = page.create_element("x-directory").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let (profiles, cards) = page
        .with_component::<Directory, _>(host, |c, tree| {
            (c.select_all(tree, "x-profile"), c.select_all(tree, "user-card"))
        })
        .unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(cards.len(), 2);

    let mut all_cards = cards;
    for profile in profiles {
        assert!(page.component::<Profile>(profile).unwrap().is_connected());
        let inner = page
            .with_component::<Profile, _>(profile, |c, tree| c.select(tree, "user-card"))
            .flatten()
            .unwrap();
        all_cards.push(inner);
    }

    for id in all_cards {
        let component = page.component::<UserCard>(id).unwrap();
        assert!(component.is_connected());
        assert_eq!(component.state().events.len(), 2);
        assert!(component.state().events[1].starts_with("connected"));
    }
}
