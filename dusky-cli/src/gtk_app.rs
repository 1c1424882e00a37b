//! libadwaita front end
//!
//! Renders the view tree as a `PreferencesWindow`: one page per config page,
//! one group per config group and an `ActionRow` with a "Run" pill per item.

use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;

use dusky_core::config::Config;
use dusky_core::dispatch::Dispatcher;
use dusky_core::view::{GroupView, PageView, RowView, WindowView};

use crate::spawn::DetachedSpawner;

pub const APP_ID: &str = "com.github.dusky.controlcenter";

/// What every Run button needs: the loaded config and the dispatcher
#[derive(Clone)]
struct Shared {
    config: Rc<Config>,
    dispatcher: Rc<Dispatcher<DetachedSpawner>>,
}

/// Run the GTK main loop until the window is closed
pub fn run_gtk(config: Config, terminal: Option<String>) -> anyhow::Result<()> {
    let app = adw::Application::builder().application_id(APP_ID).build();

    let shared = Shared {
        dispatcher: Rc::new(Dispatcher::new(
            DetachedSpawner,
            terminal,
            config.window.title.clone(),
        )),
        config: Rc::new(config),
    };

    app.connect_activate(move |app| {
        build_window(app, &shared);
    });

    // Our own flags were already parsed by clap
    let code = app.run_with_args::<&str>(&[]);
    if code != gtk::glib::ExitCode::SUCCESS {
        anyhow::bail!("GTK application exited with {:?}", code);
    }
    Ok(())
}

fn build_window(app: &adw::Application, shared: &Shared) {
    // Touch the style manager so libadwaita doesn't warn about it
    let _ = adw::StyleManager::default();

    let view = WindowView::build(&shared.config);

    let win = adw::PreferencesWindow::builder()
        .application(app)
        .title(view.title.as_str())
        .default_width(i32::try_from(view.width).unwrap_or(i32::MAX))
        .default_height(i32::try_from(view.height).unwrap_or(i32::MAX))
        .build();

    for (index, page) in view.pages.iter().enumerate() {
        win.add(&build_page(index, page, shared));
    }

    win.present();
}

fn build_page(index: usize, view: &PageView<'_>, shared: &Shared) -> adw::PreferencesPage {
    let page = adw::PreferencesPage::builder()
        .title(view.title.as_str())
        .icon_name(view.icon.as_str())
        .build();

    for (group_index, group) in view.groups.iter().enumerate() {
        page.add(&build_group((index, group_index), group, shared));
    }
    page
}

fn build_group(
    (page, group_index): (usize, usize),
    view: &GroupView<'_>,
    shared: &Shared,
) -> adw::PreferencesGroup {
    let group = adw::PreferencesGroup::builder()
        .title(view.title.as_str())
        .build();

    for (row_index, row) in view.rows.iter().enumerate() {
        group.add(&build_row((page, group_index, row_index), row, shared));
    }
    group
}

fn build_row(
    (page, group, index): (usize, usize, usize),
    view: &RowView<'_>,
    shared: &Shared,
) -> adw::ActionRow {
    let row = adw::ActionRow::builder()
        .title(view.title.as_str())
        .subtitle(view.subtitle.as_str())
        .build();

    row.add_prefix(&gtk::Image::from_icon_name(view.icon.as_str()));

    let button = gtk::Button::builder()
        .label(view.action_label)
        .valign(gtk::Align::Center)
        .build();
    button.add_css_class("pill");

    // The whole item goes to the dispatcher, not just its command
    let shared = shared.clone();
    button.connect_clicked(move |_| {
        if let Some(item) = shared.config.item_at(page, group, index) {
            shared.dispatcher.dispatch(item);
        }
    });

    row.add_suffix(&button);
    row.set_activatable_widget(Some(&button));
    row
}
