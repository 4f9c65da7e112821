use course_sheets::CourseApp;
use course_sheets::data::load_sheet_config;

fn main() -> eframe::Result<()> {
    course_sheets::init_logging();

    let config = load_sheet_config();
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Course Sheets",
        options,
        Box::new(move |cc| Ok(Box::new(CourseApp::new(cc, config)))),
    )
}
